pub mod escape;
pub mod page;
pub mod theme;

pub use escape::escape_html;
pub use page::{render_page, session_path, PageContext};
