//! Label glyphs for raster output
//!
//! The bundled DejaVu Sans face is parsed once and shared. Characters the
//! face has no glyph for (most pictographic emoji) are skipped rather than
//! drawn as boxes.

use crate::style::{LabelSide, LabelStyle};
use fontdue::{Font, FontSettings, Metrics};
use std::sync::OnceLock;
use tracing::warn;

static FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Gap between the emoji and the name, in em
const EMOJI_GAP_EM: f32 = 0.5;

/// Baseline shift below the node center, in em (SVG `dy="0.35em"`)
pub const BASELINE_SHIFT_EM: f64 = 0.35;

/// Shared label face; `None` if the embedded font fails to parse
pub fn label_font() -> Option<&'static Font> {
    static FONT: OnceLock<Option<Font>> = OnceLock::new();
    FONT.get_or_init(|| {
        match Font::from_bytes(FONT_DATA, FontSettings::default()) {
            Ok(font) => Some(font),
            Err(e) => {
                warn!(error = e, "Label font could not be loaded; exports will have no text");
                None
            }
        }
    })
    .as_ref()
}

/// One rasterized glyph, positioned relative to the run origin
pub struct Glyph {
    /// Left edge from the pen origin, in pixels
    pub left: i32,
    /// Top edge relative to the baseline (negative is above)
    pub top: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage, 0..=255
    pub coverage: Vec<u8>,
}

/// Glyphs of one label at one pixel size
pub struct GlyphRun {
    pub glyphs: Vec<Glyph>,
    /// Total advance in pixels
    pub advance: f32,
}

impl GlyphRun {
    /// Lay out `emoji name` left to right at `px`
    pub fn layout(font: &Font, emoji: Option<&str>, name: &str, px: f32) -> Self {
        let mut run = Self {
            glyphs: Vec::new(),
            advance: 0.0,
        };
        if let Some(emoji) = emoji {
            if run.push_str(font, emoji, px) {
                run.advance += EMOJI_GAP_EM * px;
            }
        }
        run.push_str(font, name, px);
        run
    }

    /// Pen x of the run's left edge so it sits on `side` of `anchor_x`
    pub fn origin_x(&self, anchor_x: f64, label: &LabelStyle) -> f64 {
        match label.side {
            LabelSide::Left => anchor_x - self.advance as f64,
            LabelSide::Right => anchor_x,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Returns whether anything visible was added
    fn push_str(&mut self, font: &Font, text: &str, px: f32) -> bool {
        let mut drew = false;
        for c in text.chars() {
            if font.lookup_glyph_index(c) == 0 {
                continue;
            }
            let (metrics, coverage) = font.rasterize(c, px);
            if metrics.width > 0 && metrics.height > 0 {
                self.glyphs.push(place(&metrics, self.advance, coverage));
                drew = true;
            }
            self.advance += metrics.advance_width;
        }
        drew
    }
}

fn place(metrics: &Metrics, pen: f32, coverage: Vec<u8>) -> Glyph {
    Glyph {
        left: (pen + metrics.xmin as f32).round() as i32,
        top: -(metrics.ymin + metrics.height as i32),
        width: metrics.width,
        height: metrics.height,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_font_loads() {
        assert!(label_font().is_some());
    }

    #[test]
    fn test_run_advances_left_to_right() {
        let font = label_font().unwrap();
        let run = GlyphRun::layout(font, None, "Sun", 32.0);
        assert_eq!(run.glyphs.len(), 3);
        assert!(run.glyphs.windows(2).all(|w| w[0].left < w[1].left));
        // Glyphs sit above the baseline
        assert!(run.glyphs.iter().all(|g| g.top < 0));
        assert!(run.advance > 32.0);
    }

    #[test]
    fn test_missing_glyphs_skipped() {
        let font = label_font().unwrap();
        let plain = GlyphRun::layout(font, None, "Leaf", 20.0);
        // No seedling in the face
        let with_icon = GlyphRun::layout(font, Some("🌱"), "Leaf", 20.0);
        assert_eq!(plain.glyphs.len(), with_icon.glyphs.len());
        assert_eq!(plain.advance, with_icon.advance);
    }

    #[test]
    fn test_origin_follows_label_side() {
        let font = label_font().unwrap();
        let run = GlyphRun::layout(font, None, "Root", 18.0);
        let left = LabelStyle::for_node(0, true);
        let right = LabelStyle::for_node(2, false);
        assert_eq!(run.origin_x(100.0, &left), 100.0 - run.advance as f64);
        assert_eq!(run.origin_x(100.0, &right), 100.0);
    }
}
