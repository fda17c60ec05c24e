//! PNG export of the current view
//!
//! Rasterizes a scene at a pixel-density multiplier onto an opaque canvas
//! filled with the theme surface color, in the same order as the SVG: links
//! first, then per node the disc with its surface-colored ring, the label
//! halo and the label text. Only what the scene contains is drawn, so nodes
//! hidden behind a collapsed ancestor never reach the bitmap.

use crate::error::{Result, TreeError};
use crate::geometry::{LinkCurve, Point, CURVE_SEGMENTS};
use crate::style::{HALO_STROKE_WIDTH, LINK_STROKE_WIDTH, NODE_STROKE_WIDTH};
use crate::text::{label_font, GlyphRun, BASELINE_SHIFT_EM};
use crate::transition::{Scene, SceneNode};
use crate::viewport::{Transform, Viewport};
use fontdue::Font;
use image::{ImageFormat, Rgba, RgbaImage};
use magicmap_common::theme::{Palette, Rgb};
use magicmap_common::Theme;
use std::io::Cursor;
use tracing::debug;

/// Download name of exported images
pub const EXPORT_FILE_NAME: &str = "magic-map.png";

/// Device pixels per CSS pixel in exported images
pub const EXPORT_PIXEL_RATIO: f64 = 2.0;

/// Largest link displacement for the sketchbook theme, in CSS pixels
///
/// Half the SVG displacement-map scale. The raster uses a smooth periodic
/// offset instead of turbulence noise, so the wobble differs in detail.
pub const SKETCH_JITTER: f64 = 2.0;

/// Largest accepted canvas edge in device pixels
const MAX_CANVAS_EDGE: u32 = 16_384;

/// Paint `scene` as the viewport currently shows it
pub fn rasterize(
    scene: &Scene,
    transform: &Transform,
    viewport: &Viewport,
    theme: Theme,
    pixel_ratio: f64,
) -> Result<RgbaImage> {
    let palette = theme.palette();
    if viewport.is_empty() || !(pixel_ratio > 0.0) {
        return Err(TreeError::Export(format!(
            "Nothing to export for a {}x{} viewport",
            viewport.width, viewport.height
        )));
    }

    let width = (viewport.width * pixel_ratio).round() as u32;
    let height = (viewport.height * pixel_ratio).round() as u32;
    if width == 0 || height == 0 || width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE {
        return Err(TreeError::Export(format!(
            "Canvas size {}x{} out of range",
            width, height
        )));
    }

    let mut canvas = Canvas {
        image: RgbaImage::from_pixel(width, height, opaque(palette.surface)),
        transform: *transform,
        pixel_ratio,
    };

    let link_half_width = LINK_STROKE_WIDTH * transform.k * pixel_ratio / 2.0;
    for link in &scene.links {
        if link.drawn <= 0.0 {
            continue;
        }
        let points = LinkCurve::horizontal(link.from, link.to).flatten(CURVE_SEGMENTS);
        let visible = ((points.len() - 1) as f64 * link.drawn.min(1.0)).ceil() as usize + 1;
        let device: Vec<Point> = points[..visible.min(points.len())]
            .iter()
            .map(|&p| {
                let p = if theme.uses_sketch_filter() { sketch_offset(p) } else { p };
                canvas.to_device(p)
            })
            .collect();
        for pair in device.windows(2) {
            canvas.stroke_segment(pair[0], pair[1], link_half_width, palette.border);
        }
    }

    let ring = NODE_STROKE_WIDTH * transform.k * pixel_ratio;
    let font = label_font();
    for node in &scene.nodes {
        if node.radius > 0.0 {
            let center = canvas.to_device(node.position);
            let radius = node.radius * transform.k * pixel_ratio;
            canvas.fill_disc(center, radius + ring / 2.0, palette.surface);
            canvas.fill_disc(center, radius - ring / 2.0, node.fill);
        }
        if let Some(font) = font {
            canvas.draw_label(font, node, &palette);
        }
    }

    Ok(canvas.image)
}

/// Rasterize at [`EXPORT_PIXEL_RATIO`] and encode as PNG
pub fn export_png(
    scene: &Scene,
    transform: &Transform,
    viewport: &Viewport,
    theme: Theme,
) -> Result<Vec<u8>> {
    let image = rasterize(scene, transform, viewport, theme, EXPORT_PIXEL_RATIO)?;

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    debug!(
        width = image.width(),
        height = image.height(),
        bytes = bytes.len(),
        "Exported tree image"
    );
    Ok(bytes)
}

fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

/// Hand-drawn wobble of a point in tree coordinates
fn sketch_offset(p: Point) -> Point {
    let dx = 0.6 * (p.x * 0.11 + p.y * 0.07).sin() + 0.4 * (p.x * 0.031 - p.y * 0.053).sin();
    let dy = 0.6 * (p.x * 0.09 - p.y * 0.13).sin() + 0.4 * (p.x * 0.047 + p.y * 0.029).sin();
    Point::new(p.x + SKETCH_JITTER * dx, p.y + SKETCH_JITTER * dy)
}

struct Canvas {
    image: RgbaImage,
    transform: Transform,
    pixel_ratio: f64,
}

impl Canvas {
    fn to_device(&self, p: Point) -> Point {
        let screen = self.transform.apply(p);
        Point::new(screen.x * self.pixel_ratio, screen.y * self.pixel_ratio)
    }

    /// Pixel rows and columns touched by a box, clipped to the image
    fn pixel_range(&self, min: Point, max: Point) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = (self.image.width() as f64, self.image.height() as f64);
        if max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = max.x.ceil().min(w - 1.0) as u32;
        let y1 = max.y.ceil().min(h - 1.0) as u32;
        Some((x0, y0, x1, y1))
    }

    /// Source-over blend of `color` at `coverage`
    fn blend(&mut self, x: u32, y: u32, color: Rgb, coverage: f64) {
        if coverage <= 0.0 {
            return;
        }
        let a = coverage.min(1.0);
        let pixel = self.image.get_pixel_mut(x, y);
        let mix = |dst: u8, src: u8| (dst as f64 * (1.0 - a) + src as f64 * a).round() as u8;
        pixel.0 = [
            mix(pixel.0[0], color.r),
            mix(pixel.0[1], color.g),
            mix(pixel.0[2], color.b),
            255,
        ];
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgb) {
        if radius <= 0.0 {
            return;
        }
        let reach = radius + 1.0;
        let Some((x0, y0, x1, y1)) = self.pixel_range(
            Point::new(center.x - reach, center.y - reach),
            Point::new(center.x + reach, center.y + reach),
        ) else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = radius + 0.5 - pixel_center.distance(center);
                self.blend(x, y, color, coverage);
            }
        }
    }

    /// Halo then text of a node label, anchored like the SVG `text-anchor`
    fn draw_label(&mut self, font: &Font, node: &SceneNode, palette: &Palette) {
        let opacity = node.label_opacity.clamp(0.0, 1.0);
        let scale = self.transform.k * self.pixel_ratio;
        let px = node.visual.label.font_size * scale;
        if opacity <= 0.0 || px < 1.0 {
            return;
        }

        let run = GlyphRun::layout(font, node.visual.emoji.as_deref(), &node.visual.name, px as f32);
        if run.is_empty() {
            return;
        }

        let center = self.to_device(node.position);
        let anchor_x = center.x + node.visual.label.offset_x() * scale;
        let origin_x = run.origin_x(anchor_x, &node.visual.label).round() as i64;
        let baseline = (center.y + BASELINE_SHIFT_EM * px).round() as i64;

        let halo_radius = HALO_STROKE_WIDTH / 2.0 * scale;
        let pad = halo_radius.ceil() as i64 + 1;
        let min_x = run.glyphs.iter().map(|g| g.left as i64).min().unwrap_or(0) - pad;
        let max_x = run.glyphs.iter().map(|g| g.left as i64 + g.width as i64).max().unwrap_or(0) + pad;
        let min_y = run.glyphs.iter().map(|g| g.top as i64).min().unwrap_or(0) - pad;
        let max_y = run.glyphs.iter().map(|g| g.top as i64 + g.height as i64).max().unwrap_or(0) + pad;
        let (w, h) = ((max_x - min_x) as usize, (max_y - min_y) as usize);

        let mut ink = vec![0.0f64; w * h];
        for glyph in &run.glyphs {
            let gx = (glyph.left as i64 - min_x) as usize;
            let gy = (glyph.top as i64 - min_y) as usize;
            for (i, &alpha) in glyph.coverage.iter().enumerate() {
                let idx = (gy + i / glyph.width) * w + gx + i % glyph.width;
                ink[idx] = ink[idx].max(alpha as f64 / 255.0);
            }
        }
        let halo = dilate(&ink, w, h, halo_radius);

        let (iw, ih) = (self.image.width() as i64, self.image.height() as i64);
        for y in 0..h {
            let dy = baseline + min_y + y as i64;
            if dy < 0 || dy >= ih {
                continue;
            }
            for x in 0..w {
                let dx = origin_x + min_x + x as i64;
                if dx < 0 || dx >= iw {
                    continue;
                }
                let idx = y * w + x;
                self.blend(dx as u32, dy as u32, palette.surface, halo[idx] * opacity);
                self.blend(dx as u32, dy as u32, palette.text, ink[idx] * opacity);
            }
        }
    }

    fn stroke_segment(&mut self, a: Point, b: Point, half_width: f64, color: Rgb) {
        let reach = half_width + 1.0;
        let Some((x0, y0, x1, y1)) = self.pixel_range(
            Point::new(a.x.min(b.x) - reach, a.y.min(b.y) - reach),
            Point::new(a.x.max(b.x) + reach, a.y.max(b.y) + reach),
        ) else {
            return;
        };

        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let length_sq = dx * dx + dy * dy;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let t = if length_sq > 0.0 {
                    (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let nearest = Point::new(a.x + dx * t, a.y + dy * t);
                let coverage = half_width + 0.5 - p.distance(nearest);
                self.blend(x, y, color, coverage);
            }
        }
    }
}

/// Max of `mask` within `radius` of each cell
fn dilate(mask: &[f64], w: usize, h: usize, radius: f64) -> Vec<f64> {
    if radius <= 0.0 {
        return mask.to_vec();
    }
    let reach = radius.ceil() as i64;
    let offsets: Vec<(i64, i64)> = (-reach..=reach)
        .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f64) <= radius * radius)
        .collect();

    let mut out = vec![0.0; mask.len()];
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let mut best = 0.0f64;
            for &(dx, dy) in &offsets {
                let (sx, sy) = (x + dx, y + dy);
                if sx >= 0 && sy >= 0 && sx < w as i64 && sy < h as i64 {
                    best = best.max(mask[(sy as usize) * w + sx as usize]);
                }
            }
            out[(y as usize) * w + x as usize] = best;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::layout_tree::{LayoutTree, NodeId};
    use crate::tidy::TidyLayout;
    use magicmap_common::{Theme, TreeNode};

    fn settled_scene() -> (Scene, Frame) {
        let root = TreeNode::branch("Root", vec![TreeNode::leaf("A"), TreeNode::leaf("B")]);
        let tree = LayoutTree::build(&root).unwrap();
        let frame = Frame::build(&tree, &TidyLayout::default());
        (Scene::settled(&frame), frame)
    }

    fn device_pixel(image: &RgbaImage, transform: &Transform, p: Point) -> [u8; 4] {
        let screen = transform.apply(p);
        image
            .get_pixel((screen.x * 2.0) as u32, (screen.y * 2.0) as u32)
            .0
    }

    #[test]
    fn test_canvas_is_double_size_and_opaque() {
        let (scene, _) = settled_scene();
        let viewport = Viewport::new(400.0, 300.0);
        let palette = Theme::Space.palette();
        let transform = Transform { x: 100.0, y: 150.0, k: 1.0 };

        let image = rasterize(&scene, &transform, &viewport, Theme::Space, EXPORT_PIXEL_RATIO).unwrap();
        assert_eq!((image.width(), image.height()), (800, 600));
        assert!(image.pixels().all(|p| p.0[3] == 255));
        // Corner is background
        assert_eq!(image.get_pixel(0, 0).0, opaque(palette.surface).0);
    }

    #[test]
    fn test_nodes_painted_with_fill() {
        let (scene, frame) = settled_scene();
        let transform = Transform { x: 100.0, y: 150.0, k: 1.0 };
        let image = rasterize(
            &scene,
            &transform,
            &Viewport::new(400.0, 300.0),
            Theme::Light,
            EXPORT_PIXEL_RATIO,
        )
        .unwrap();

        for node in &frame.nodes {
            assert_eq!(
                device_pixel(&image, &transform, node.position),
                opaque(node.fill).0,
                "node {} center",
                node.id
            );
        }
    }

    #[test]
    fn test_empty_viewport_is_an_error() {
        let (scene, _) = settled_scene();
        let result = export_png(
            &scene,
            &Transform::IDENTITY,
            &Viewport::new(0.0, 100.0),
            Theme::Light,
        );
        assert!(matches!(result, Err(TreeError::Export(_))));
    }

    #[test]
    fn test_png_signature() {
        let (scene, _) = settled_scene();
        let bytes = export_png(
            &scene,
            &Transform { x: 60.0, y: 50.0, k: 0.5 },
            &Viewport::new(200.0, 100.0),
            Theme::Jungle,
        )
        .unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    /// Pixels in the device box that differ from the surface
    fn inked(image: &RgbaImage, surface: Rgb, min: Point, max: Point) -> usize {
        let mut count = 0;
        for y in min.y.max(0.0) as u32..(max.y as u32).min(image.height()) {
            for x in min.x.max(0.0) as u32..(max.x as u32).min(image.width()) {
                if image.get_pixel(x, y).0 != opaque(surface).0 {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_labels_rasterized_on_their_side() {
        let root = TreeNode::branch("Root", vec![TreeNode::leaf("Alpha"), TreeNode::leaf("Beta")]);
        let tree = LayoutTree::build(&root).unwrap();
        let frame = Frame::build(&tree, &TidyLayout::default());
        let transform = Transform { x: 150.0, y: 150.0, k: 1.0 };
        let palette = Theme::Light.palette();
        let mut scene = Scene::settled(&frame);
        scene.links.clear();
        let image = rasterize(
            &scene,
            &transform,
            &Viewport::new(500.0, 300.0),
            Theme::Light,
            EXPORT_PIXEL_RATIO,
        )
        .unwrap();

        let device = |p: Point| {
            let s = transform.apply(p);
            Point::new(s.x * 2.0, s.y * 2.0)
        };

        // Leaf labels start right of the node
        let alpha = device(frame.node(NodeId(1)).unwrap().position);
        let right = inked(
            &image,
            palette.surface,
            Point::new(alpha.x + 52.0, alpha.y - 20.0),
            Point::new(alpha.x + 150.0, alpha.y + 14.0),
        );
        assert!(right > 0, "no ink right of Alpha");

        // Root label ends left of the node
        let center = device(frame.node(NodeId(0)).unwrap().position);
        let left = inked(
            &image,
            palette.surface,
            Point::new(center.x - 160.0, center.y - 24.0),
            Point::new(center.x - 52.0, center.y + 16.0),
        );
        assert!(left > 0, "no ink left of Root");

        // Nothing on the far side of a leaf
        let far = inked(
            &image,
            palette.surface,
            Point::new(alpha.x - 120.0, alpha.y - 20.0),
            Point::new(alpha.x - 36.0, alpha.y + 14.0),
        );
        assert_eq!(far, 0);
    }

    #[test]
    fn test_hidden_label_not_drawn() {
        let (mut scene, _) = settled_scene();
        for node in &mut scene.nodes {
            node.label_opacity = 0.0;
        }
        scene.links.clear();
        let transform = Transform { x: 100.0, y: 150.0, k: 1.0 };
        let image = rasterize(
            &scene,
            &transform,
            &Viewport::new(400.0, 300.0),
            Theme::Light,
            EXPORT_PIXEL_RATIO,
        )
        .unwrap();

        let surface = Theme::Light.palette().surface;
        let node = device_pixel(&image, &transform, scene.nodes[1].position);
        assert_ne!(node, opaque(surface).0);
        let beside = transform.apply(scene.nodes[1].position);
        let ink = inked(
            &image,
            surface,
            Point::new(beside.x * 2.0 + 52.0, beside.y * 2.0 - 20.0),
            Point::new(beside.x * 2.0 + 120.0, beside.y * 2.0 + 14.0),
        );
        assert_eq!(ink, 0);
    }

    #[test]
    fn test_sketch_links_wobble() {
        let (scene, _) = settled_scene();
        let link = scene.links[0];
        let points = LinkCurve::horizontal(link.from, link.to).flatten(CURVE_SEGMENTS);

        let shifts: Vec<f64> = points.iter().map(|&p| sketch_offset(p).distance(p)).collect();
        assert!(shifts.iter().all(|d| *d <= SKETCH_JITTER * 2.0_f64.sqrt()));
        assert!(shifts.iter().any(|d| *d > 0.1));

        // The stroke follows the displaced curve
        let transform = Transform { x: 100.0, y: 150.0, k: 1.0 };
        let palette = Theme::Sketchbook.palette();
        let image = rasterize(
            &scene,
            &transform,
            &Viewport::new(400.0, 300.0),
            Theme::Sketchbook,
            EXPORT_PIXEL_RATIO,
        )
        .unwrap();
        let mid = sketch_offset(points[CURVE_SEGMENTS / 2]);
        assert_ne!(device_pixel(&image, &transform, mid), opaque(palette.surface).0);
    }
}
