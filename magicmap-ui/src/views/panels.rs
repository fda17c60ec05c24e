//! Welcome, loading, and error panels

use super::escape;

pub const WELCOME_TITLE: &str = "Let's Draw Your Ideas!";
pub const WELCOME_TEXT: &str =
    "Type in the box, or upload a scan of your notes, and I'll turn them into a cool idea map for you!";
pub const ERROR_TITLE: &str = "Oops, an Error!";
pub const LOADING_TEXT: &str = "Drawing your map...";

pub fn welcome() -> String {
    format!(
        r#"<div class="panel welcome"><span class="emoji">🗺️</span><h2>{}</h2><p>{}</p></div>"#,
        escape(WELCOME_TITLE),
        escape(WELCOME_TEXT)
    )
}

pub fn loading() -> String {
    format!(
        r#"<div class="panel loading"><div class="spinner"></div><p>{}</p></div>"#,
        LOADING_TEXT
    )
}

pub fn error(message: &str) -> String {
    format!(
        r#"<div class="panel error"><span class="emoji">😟</span><h2>{}</h2><p>{}</p></div>"#,
        ERROR_TITLE,
        escape(message)
    )
}
