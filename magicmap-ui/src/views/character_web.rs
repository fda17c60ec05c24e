//! Character web view: character cards and a relationship list

use super::escape;
use magicmap_common::models::CharacterWeb;
use std::fmt::Write;

pub const DEFAULT_EMOJI: &str = "👤";

pub fn render(web: &CharacterWeb) -> String {
    let mut html = String::from(r#"<div class="character-web"><h2>Characters</h2><div class="character-cards">"#);
    for character in &web.characters {
        let _ = write!(
            html,
            r#"<div class="character-card"><span class="emoji">{}</span><h3>{}</h3><p>{}</p></div>"#,
            escape(character.emoji.as_deref().unwrap_or(DEFAULT_EMOJI)),
            escape(&character.name),
            escape(&character.description),
        );
    }
    html.push_str(r#"</div><h2>Relationships</h2><ul class="relationships">"#);
    for relationship in &web.relationships {
        let _ = write!(
            html,
            r#"<li><strong>{} ↔ {}</strong><p>"{}"</p></li>"#,
            escape(&relationship.source),
            escape(&relationship.target),
            escape(&relationship.description),
        );
    }
    html.push_str("</ul></div>");
    html
}
