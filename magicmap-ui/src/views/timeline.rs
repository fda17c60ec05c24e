//! Timeline view: events in the order the AI returned them

use super::escape;
use magicmap_common::models::TimelineEvent;
use std::fmt::Write;

pub const DEFAULT_EMOJI: &str = "📅";

pub fn render(events: &[TimelineEvent]) -> String {
    let mut html = String::from(r#"<ol class="timeline">"#);
    for event in events {
        let _ = write!(
            html,
            r#"<li class="timeline-event"><span class="emoji">{}</span><div class="timeline-body"><p class="timeline-date">{}</p><h3>{}</h3><p>{}</p></div></li>"#,
            escape(event.emoji.as_deref().unwrap_or(DEFAULT_EMOJI)),
            escape(&event.date),
            escape(&event.title),
            escape(&event.description),
        );
    }
    html.push_str("</ol>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: &str, title: &str, emoji: Option<&str>) -> TimelineEvent {
        TimelineEvent {
            date: date.to_string(),
            title: title.to_string(),
            description: format!("About {title}"),
            emoji: emoji.map(str::to_string),
        }
    }

    #[test]
    fn test_order_kept_and_default_emoji() {
        let html = render(&[event("1969", "Moon", Some("🚀")), event("1492", "Voyage", None)]);
        let moon = html.find("Moon").unwrap();
        let voyage = html.find("Voyage").unwrap();
        assert!(moon < voyage);
        assert!(html.contains("🚀"));
        assert!(html.contains(DEFAULT_EMOJI));
    }

    #[test]
    fn test_escapes_text() {
        let html = render(&[event("<1900", "A & B", None)]);
        assert!(html.contains("&lt;1900"));
        assert!(html.contains("A &amp; B"));
    }
}
