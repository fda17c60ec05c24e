//! Node and label styling rules

use magicmap_common::theme::Rgb;
use serde::Serialize;

pub const ROOT_FILL: Rgb = Rgb::new(0x8a, 0x2b, 0xe2);
pub const COLLAPSED_FILL: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);

/// Ten-color categorical palette, cycled by depth
pub const CATEGORY10: [Rgb; 10] = [
    Rgb::new(0x1f, 0x77, 0xb4),
    Rgb::new(0xff, 0x7f, 0x0e),
    Rgb::new(0x2c, 0xa0, 0x2c),
    Rgb::new(0xd6, 0x27, 0x28),
    Rgb::new(0x94, 0x67, 0xbd),
    Rgb::new(0x8c, 0x56, 0x4b),
    Rgb::new(0xe3, 0x77, 0xc2),
    Rgb::new(0x7f, 0x7f, 0x7f),
    Rgb::new(0xbc, 0xbd, 0x22),
    Rgb::new(0x17, 0xbe, 0xcf),
];

pub const ROOT_RADIUS: f64 = 20.0;
pub const NODE_RADIUS: f64 = 15.0;
pub const LABEL_OFFSET: f64 = 25.0;
pub const NODE_STROKE_WIDTH: f64 = 3.0;
pub const LINK_STROKE_WIDTH: f64 = 2.5;
pub const HALO_STROKE_WIDTH: f64 = 3.0;

/// Collapsed wins over depth
pub fn node_fill(depth: usize, collapsed: bool) -> Rgb {
    if collapsed {
        COLLAPSED_FILL
    } else if depth == 0 {
        ROOT_FILL
    } else {
        CATEGORY10[(depth - 1) % CATEGORY10.len()]
    }
}

pub fn node_radius(depth: usize) -> f64 {
    if depth == 0 {
        ROOT_RADIUS
    } else {
        NODE_RADIUS
    }
}

/// Which side of the circle the label sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelStyle {
    pub side: LabelSide,
    pub font_size: f64,
}

impl LabelStyle {
    /// Root and nodes showing children are labelled on the left
    pub fn for_node(depth: usize, has_visible_children: bool) -> Self {
        let side = if depth == 0 || has_visible_children {
            LabelSide::Left
        } else {
            LabelSide::Right
        };
        let font_size = if depth == 0 { 18.0 } else { 16.0 };
        Self { side, font_size }
    }

    /// Horizontal offset from the node center
    pub fn offset_x(&self) -> f64 {
        match self.side {
            LabelSide::Left => -LABEL_OFFSET,
            LabelSide::Right => LABEL_OFFSET,
        }
    }

    /// SVG `text-anchor`
    pub fn anchor(&self) -> &'static str {
        match self.side {
            LabelSide::Left => "end",
            LabelSide::Right => "start",
        }
    }

    /// Rough rendered width of `emoji name`
    ///
    /// Uses average glyph widths (0.6em per character, 1.2em per emoji) since
    /// no font metrics are available.
    pub fn approximate_width(&self, name: &str, emoji: Option<&str>) -> f64 {
        let text = name.chars().count() as f64 * 0.6 * self.font_size;
        let icon = emoji.map(|_| 1.7 * self.font_size).unwrap_or(0.0);
        text + icon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rules() {
        assert_eq!(node_fill(0, false).to_hex(), "#8a2be2");
        assert_eq!(node_fill(1, false), CATEGORY10[0]);
        assert_eq!(node_fill(11, false), CATEGORY10[0]);
        assert_eq!(node_fill(0, true).to_hex(), "#cccccc");
        assert_eq!(node_fill(3, true), COLLAPSED_FILL);
    }

    #[test]
    fn test_label_sides() {
        let root = LabelStyle::for_node(0, false);
        assert_eq!(root.anchor(), "end");
        assert_eq!(root.offset_x(), -25.0);
        assert_eq!(root.font_size, 18.0);

        let parent = LabelStyle::for_node(2, true);
        assert_eq!(parent.side, LabelSide::Left);

        let leaf = LabelStyle::for_node(2, false);
        assert_eq!(leaf.anchor(), "start");
        assert_eq!(leaf.offset_x(), 25.0);
        assert_eq!(leaf.font_size, 16.0);
    }

    #[test]
    fn test_radius() {
        assert_eq!(node_radius(0), 20.0);
        assert_eq!(node_radius(4), 15.0);
    }
}
