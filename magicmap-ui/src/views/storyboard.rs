//! Storyboard view: panels ordered by scene number

use super::escape;
use magicmap_common::models::StoryboardPanel;
use std::fmt::Write;

pub const DEFAULT_EMOJI: &str = "🎬";

/// Panels sorted by scene; equal scene numbers keep their original order
pub fn ordered(panels: &[StoryboardPanel]) -> Vec<&StoryboardPanel> {
    let mut sorted: Vec<&StoryboardPanel> = panels.iter().collect();
    sorted.sort_by_key(|p| p.scene);
    sorted
}

pub fn render(panels: &[StoryboardPanel]) -> String {
    let mut html = String::from(r#"<div class="storyboard">"#);
    for panel in ordered(panels) {
        let _ = write!(
            html,
            r#"<div class="storyboard-panel"><span class="emoji">{}</span><h3>Scene {}</h3><p>{}</p></div>"#,
            escape(panel.emoji.as_deref().unwrap_or(DEFAULT_EMOJI)),
            panel.scene,
            escape(&panel.description),
        );
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(scene: i64, description: &str) -> StoryboardPanel {
        StoryboardPanel {
            scene,
            description: description.to_string(),
            emoji: None,
        }
    }

    #[test]
    fn test_sorted_by_scene() {
        let panels = [panel(3, "c"), panel(1, "a"), panel(2, "b1"), panel(2, "b2")];
        let order: Vec<&str> = ordered(&panels).iter().map(|p| p.description.as_str()).collect();
        assert_eq!(order, vec!["a", "b1", "b2", "c"]);

        let html = render(&panels);
        assert!(html.find("Scene 1").unwrap() < html.find("Scene 3").unwrap());
        assert_eq!(html.matches(DEFAULT_EMOJI).count(), 4);
    }
}
