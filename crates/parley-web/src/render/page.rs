use axum::http::StatusCode;
use parley_session::RenderModel;
use parley_types::{ChatRecord, Theme};
use std::fmt::Write;

use super::escape::{encode_path_segment, escape_html, push_escaped};
use super::theme::stylesheet;

/// Per-request values the page needs besides the render model
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub app_title: &'a str,
    pub session_id: &'a str,
}

impl PageContext<'_> {
    fn session_path(&self) -> String {
        session_path(self.session_id)
    }
}

/// Location of a session's page
pub fn session_path(session_id: &str) -> String {
    format!("/s/{}", encode_path_segment(session_id))
}

/// A complete page for one render pass
pub fn render_page(ctx: PageContext<'_>, model: &RenderModel) -> String {
    let mut html = page_start(ctx, model);
    html.push_str(&page_end(ctx));
    html
}

/// Everything up to and including the last history record, with the chat
/// container still open
pub fn page_start(ctx: PageContext<'_>, model: &RenderModel) -> String {
    let mut html = String::with_capacity(4096);
    let title = escape_html(ctx.app_title);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{css}</style>\n</head>\n<body class=\"theme-{theme}\">\n",
        css = stylesheet(model.theme),
        theme = model.theme.as_str(),
    );

    write_sidebar(&mut html, ctx, model);

    html.push_str("<main class=\"main\">\n<div class=\"chat-container\" id=\"chat\">\n");
    for record in &model.messages {
        write_record(&mut html, record);
    }
    html
}

/// Closes the chat container and draws the input box
pub fn page_end(ctx: PageContext<'_>) -> String {
    let session_path = ctx.session_path();
    format!(
        "</div>\n\
         <form class=\"chat-input\" method=\"post\" action=\"{session_path}/messages\">\n\
         <input type=\"text\" name=\"content\" placeholder=\"Type your message...\" autocomplete=\"off\" autofocus>\n\
         <button type=\"submit\">Send</button>\n\
         </form>\n</main>\n\
         <script>\n\
         if (window.location.pathname !== \"{session_path}\") {{ history.replaceState(null, \"\", \"{session_path}\"); }}\n\
         window.scrollTo(0, document.body.scrollHeight);\n\
         </script>\n</body>\n</html>\n"
    )
}

/// Opens the bubble the streamed reply is written into
pub fn assistant_open() -> &'static str {
    "<div class=\"assistant-message\">"
}

pub fn bubble_close() -> &'static str {
    "</div>\n"
}

/// Escaped reply fragment
pub fn fragment(text: &str) -> String {
    escape_html(text)
}

pub fn error_notice(message: &str) -> String {
    format!(
        "<div class=\"error-notice\" role=\"alert\">{}</div>\n",
        escape_html(message)
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{status}</title>\n<style>{css}</style>\n</head>\n<body>\n\
         <main class=\"main\"><div class=\"chat-container\">\n<h1>{status}</h1>\n{notice}\
         <p><a href=\"/\">Start over</a></p>\n</div></main>\n</body>\n</html>\n",
        css = stylesheet(Theme::default()),
        notice = error_notice(message),
    )
}

fn write_record(html: &mut String, record: &ChatRecord) {
    let _ = write!(html, "<div class=\"{}-message\">", record.role.as_str());
    push_escaped(html, &record.content);
    html.push_str(bubble_close());
}

fn write_sidebar(html: &mut String, ctx: PageContext<'_>, model: &RenderModel) {
    let session_path = ctx.session_path();

    html.push_str("<aside class=\"sidebar\">\n<h1>");
    push_escaped(html, ctx.app_title);
    html.push_str("</h1>\n");

    let _ = write!(
        html,
        "<form method=\"post\" action=\"{session_path}/new\">\
         <button class=\"new-chat\" type=\"submit\">New Chat</button></form>\n"
    );

    html.push_str("<h2>My Conversations</h2>\n<ul class=\"threads\">\n");
    for entry in &model.threads {
        let thread_path = format!(
            "{session_path}/threads/{}",
            encode_path_segment(&entry.thread_id)
        );
        let class = if entry.active { " class=\"active\"" } else { "" };
        let _ = write!(
            html,
            "<li{class}>\
             <form method=\"post\" action=\"{thread_path}/select\" class=\"select-form\">\
             <button class=\"select\" type=\"submit\" title=\"{id}\">{title}</button></form>\
             <form method=\"post\" action=\"{thread_path}/delete\">\
             <button class=\"delete\" type=\"submit\" aria-label=\"Delete\">&#x2715;</button></form>\
             </li>\n",
            id = escape_html(&entry.thread_id),
            title = escape_html(&entry.title),
        );
    }
    html.push_str("</ul>\n");

    let _ = write!(
        html,
        "<form method=\"post\" action=\"{session_path}/theme\">\
         <fieldset class=\"theme-picker\"><legend>Theme</legend>\n"
    );
    for theme in Theme::ALL {
        let checked = if theme == model.theme { " checked" } else { "" };
        let _ = write!(
            html,
            "<label><input type=\"radio\" name=\"theme\" value=\"{value}\" \
             onchange=\"this.form.submit()\"{checked}> {label}</label>\n",
            value = theme.as_str(),
            label = theme.label(),
        );
    }
    html.push_str(
        "<noscript><button type=\"submit\">Apply</button></noscript>\
         </fieldset></form>\n</aside>\n",
    );
}
