use parley_types::Theme;

struct Palette {
    page_background: &'static str,
    page_text: &'static str,
    user_background: &'static str,
    assistant_background: &'static str,
    assistant_text: &'static str,
    user_radius: &'static str,
    assistant_radius: &'static str,
    sidebar_background: &'static str,
    border: &'static str,
}

const DARK: Palette = Palette {
    page_background: "#0e1117",
    page_text: "white",
    user_background: "#005cbb",
    assistant_background: "#262730",
    assistant_text: "white",
    user_radius: "12px",
    assistant_radius: "12px",
    sidebar_background: "#262730",
    border: "#3a3b45",
};

const LIGHT: Palette = Palette {
    page_background: "#ffffff",
    page_text: "black",
    user_background: "#1976d2",
    assistant_background: "#f1f1f1",
    assistant_text: "black",
    user_radius: "18px 18px 4px 18px",
    assistant_radius: "18px 18px 18px 4px",
    sidebar_background: "#f0f2f6",
    border: "#d0d3da",
};

fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Dark => &DARK,
        Theme::Light => &LIGHT,
    }
}

/// Stylesheet for one theme
pub fn stylesheet(theme: Theme) -> String {
    let p = palette(theme);
    format!(
        r#"
body {{ margin: 0; font-family: sans-serif; background-color: {page_bg}; color: {page_text}; display: flex; min-height: 100vh; }}
.sidebar {{ width: 260px; padding: 1rem; background-color: {sidebar_bg}; border-right: 1px solid {border}; overflow-y: auto; }}
.sidebar h1 {{ font-size: 1.2rem; }}
.sidebar h2 {{ font-size: 0.95rem; margin: 1rem 0 0.5rem; }}
.sidebar form {{ margin: 0; }}
.sidebar button {{ cursor: pointer; }}
.new-chat {{ width: 100%; padding: 0.5rem; margin-bottom: 1rem; }}
.threads {{ list-style: none; padding: 0; margin: 0 0 1rem 0; }}
.threads li {{ display: flex; gap: 0.25rem; margin-bottom: 0.25rem; }}
.threads .select {{ flex: 1; text-align: left; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }}
.threads .active .select {{ font-weight: bold; }}
.theme-picker {{ border: 1px solid {border}; }}
.main {{ flex: 1; display: flex; flex-direction: column; }}
.chat-container {{ max-width: 800px; width: 100%; margin: 0 auto; padding: 1rem; flex: 1; }}
.user-message {{ background-color: {user_bg}; color: white; padding: 10px 14px; border-radius: {user_radius}; margin: 8px 0 8px auto; max-width: 70%; width: fit-content; white-space: pre-wrap; }}
.assistant-message {{ background-color: {assistant_bg}; color: {assistant_text}; padding: 10px 14px; border-radius: {assistant_radius}; margin: 8px auto 8px 0; white-space: pre-wrap; }}
.error-notice {{ border: 1px solid #d32f2f; color: #d32f2f; padding: 8px 12px; border-radius: 8px; margin: 8px 0; }}
.chat-input {{ max-width: 800px; width: 100%; margin: 0 auto; padding: 1rem; box-sizing: border-box; display: flex; gap: 0.5rem; }}
.chat-input input {{ flex: 1; padding: 0.6rem; }}
"#,
        page_bg = p.page_background,
        page_text = p.page_text,
        sidebar_bg = p.sidebar_background,
        border = p.border,
        user_bg = p.user_background,
        user_radius = p.user_radius,
        assistant_bg = p.assistant_background,
        assistant_text = p.assistant_text,
        assistant_radius = p.assistant_radius,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_palette() {
        let css = stylesheet(Theme::Dark);
        assert!(css.contains("background-color: #0e1117"));
        assert!(css.contains("background-color: #005cbb"));
        assert!(css.contains("background-color: #262730"));
        assert!(css.contains("border-radius: 12px"));
    }

    #[test]
    fn test_light_palette() {
        let css = stylesheet(Theme::Light);
        assert!(css.contains("background-color: #ffffff"));
        assert!(css.contains("background-color: #1976d2"));
        assert!(css.contains("background-color: #f1f1f1; color: black"));
        assert!(css.contains("border-radius: 18px 18px 4px 18px"));
        assert!(css.contains("border-radius: 18px 18px 18px 4px"));
    }

    #[test]
    fn test_layout_shared() {
        for theme in Theme::ALL {
            let css = stylesheet(theme);
            assert!(css.contains("max-width: 800px"));
            assert!(css.contains("max-width: 70%"));
        }
    }
}
