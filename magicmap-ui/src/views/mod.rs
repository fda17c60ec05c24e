//! HTML fragments for the map area
//!
//! The tree is drawn by `magicmap-tv` as SVG; the list-style maps and the
//! status panels are plain HTML built here. All text is escaped.

pub mod character_web;
pub mod dispatcher;
pub mod panels;
pub mod storyboard;
pub mod timeline;

pub use dispatcher::{dispatch, View};
pub use magicmap_tv::svg::escape;

use crate::session::Session;
use magicmap_common::MapData;

/// Map area for the session's current state
///
/// Loading wins over an error message, which wins over the map itself.
pub fn render_view(session: &Session) -> String {
    if session.is_loading() {
        return panels::loading();
    }
    if let Some(message) = session.error() {
        return panels::error(message);
    }
    match session.map() {
        None => panels::welcome(),
        Some(MapData::Tree(_)) => {
            let elapsed = session.renderer().elapsed_ms().unwrap_or(0.0);
            format!(
                r#"<div class="tree-view">{}</div>"#,
                session.renderer().svg(elapsed)
            )
        }
        Some(MapData::Timeline(events)) => timeline::render(events),
        Some(MapData::Storyboard(panels)) => storyboard::render(panels),
        Some(MapData::CharacterWeb(web)) => character_web::render(web),
    }
}
