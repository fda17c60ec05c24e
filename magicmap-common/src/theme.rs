//! Visual themes
//!
//! A theme is a plain value handed to whoever renders; nothing here touches
//! shared presentation state. Renderers read the palette and font, and check
//! [`Theme::uses_sketch_filter`] for the hand-drawn link effect.

use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colors and font a renderer needs from a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Background of the drawing surface (also the export background)
    pub surface: Rgb,
    /// Main text color
    pub text: Rgb,
    /// Lines and borders (tree links use this)
    pub border: Rgb,
    /// Accent used for headings in list views
    pub primary: Rgb,
    /// CSS font-family value
    pub font_family: &'static str,
}

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Space,
    Jungle,
    Sketchbook,
}

impl Theme {
    /// Parse from the lowercase name
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "space" => Some(Theme::Space),
            "jungle" => Some(Theme::Jungle),
            "sketchbook" => Some(Theme::Sketchbook),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Space => "space",
            Theme::Jungle => "jungle",
            Theme::Sketchbook => "sketchbook",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Day Mode",
            Theme::Space => "Space Adventure",
            Theme::Jungle => "Jungle Explorer",
            Theme::Sketchbook => "Sketchbook",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                surface: Rgb::new(255, 255, 255),
                text: Rgb::new(30, 41, 59),
                border: Rgb::new(203, 213, 225),
                primary: Rgb::new(99, 102, 241),
                font_family: "'Nunito', sans-serif",
            },
            Theme::Space => Palette {
                surface: Rgb::new(30, 27, 75),
                text: Rgb::new(224, 231, 255),
                border: Rgb::new(99, 102, 241),
                primary: Rgb::new(167, 139, 250),
                font_family: "'Nunito', sans-serif",
            },
            Theme::Jungle => Palette {
                surface: Rgb::new(240, 253, 244),
                text: Rgb::new(20, 83, 45),
                border: Rgb::new(134, 239, 172),
                primary: Rgb::new(22, 163, 74),
                font_family: "'Nunito', sans-serif",
            },
            Theme::Sketchbook => Palette {
                surface: Rgb::new(255, 253, 245),
                text: Rgb::new(55, 48, 40),
                border: Rgb::new(120, 110, 95),
                primary: Rgb::new(180, 83, 9),
                font_family: "'Patrick Hand', cursive",
            },
        }
    }

    /// Hand-drawn displacement filter on link strokes
    pub fn uses_sketch_filter(&self) -> bool {
        matches!(self, Theme::Sketchbook)
    }

    pub fn all_variants() -> &'static [Theme] {
        &[Theme::Light, Theme::Space, Theme::Jungle, Theme::Sketchbook]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}
