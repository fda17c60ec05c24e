//! SVG rendering of a scene
//!
//! Produces a standalone document: optional background, the sketch filter
//! definition when the theme asks for it, then one transformed group holding
//! links (drawn first) and nodes.

use crate::geometry::LinkCurve;
use crate::style::{HALO_STROKE_WIDTH, LINK_STROKE_WIDTH, NODE_STROKE_WIDTH};
use crate::transition::{Scene, SceneLink, SceneNode};
use crate::viewport::{Transform, Viewport};
use magicmap_common::theme::Palette;
use magicmap_common::Theme;
use std::fmt::Write;

pub const SKETCH_FILTER_ID: &str = "sketchy";

/// Options for one SVG document
#[derive(Debug, Clone, Copy)]
pub struct SvgOptions {
    pub theme: Theme,
    pub viewport: Viewport,
    pub transform: Transform,
    /// Paint the theme surface behind the tree
    pub background: bool,
}

pub fn render(scene: &Scene, options: &SvgOptions) -> String {
    let palette = options.theme.palette();
    let sketch = options.theme.uses_sketch_filter();
    let (w, h) = (options.viewport.width, options.viewport.height);

    let mut svg = String::with_capacity(256 + scene.nodes.len() * 512);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
        font = escape(palette.font_family),
    );

    if sketch {
        let _ = write!(
            svg,
            r#"<defs><filter id="{SKETCH_FILTER_ID}"><feTurbulence type="fractalNoise" baseFrequency="0.05" numOctaves="3" result="noise"/><feDisplacementMap in="SourceGraphic" in2="noise" scale="4"/></filter></defs>"#
        );
    }

    if options.background {
        let _ = write!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            palette.surface.to_hex()
        );
    }

    let _ = write!(svg, r#"<g transform="{}">"#, options.transform.to_svg());
    for link in &scene.links {
        write_link(&mut svg, link, &palette, sketch);
    }
    for node in &scene.nodes {
        write_node(&mut svg, node, &palette);
    }
    svg.push_str("</g></svg>");
    svg
}

fn write_link(svg: &mut String, link: &SceneLink, palette: &Palette, sketch: bool) {
    if link.drawn <= 0.0 {
        return;
    }
    let curve = LinkCurve::horizontal(link.from, link.to);
    let _ = write!(
        svg,
        r#"<path class="link" data-target="{}" d="{}" fill="none" stroke="{}" stroke-width="{}""#,
        link.target,
        curve.to_path_data(),
        palette.border.to_hex(),
        LINK_STROKE_WIDTH
    );
    if link.drawn < 1.0 {
        let length = curve.length();
        let _ = write!(
            svg,
            r#" stroke-dasharray="{length:.2} {length:.2}" stroke-dashoffset="{:.2}""#,
            length * (1.0 - link.drawn)
        );
    }
    if sketch {
        let _ = write!(svg, r#" filter="url(#{SKETCH_FILTER_ID})""#);
    }
    svg.push_str("/>");
}

fn write_node(svg: &mut String, node: &SceneNode, palette: &Palette) {
    let visual = &node.visual;
    let class = if visual.expandable { "node expandable" } else { "node" };
    let _ = write!(
        svg,
        r#"<g class="{class}" data-id="{}" transform="translate({:.2},{:.2})">"#,
        visual.id, node.position.x, node.position.y
    );
    let _ = write!(
        svg,
        r#"<circle r="{:.2}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
        node.radius.max(0.0),
        node.fill.to_hex(),
        palette.surface.to_hex(),
        NODE_STROKE_WIDTH
    );

    let content = label_content(visual.emoji.as_deref(), &visual.name);
    let attrs = format!(
        r#"x="{}" dy="0.35em" text-anchor="{}" font-size="{}" opacity="{:.3}""#,
        visual.label.offset_x(),
        visual.label.anchor(),
        visual.label.font_size,
        node.label_opacity
    );
    // Halo first so the text sits on top of it
    let _ = write!(
        svg,
        r#"<text {attrs} fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round">{content}</text>"#,
        palette.surface.to_hex(),
        HALO_STROKE_WIDTH
    );
    let _ = write!(
        svg,
        r#"<text {attrs} fill="{}">{content}</text>"#,
        palette.text.to_hex()
    );
    svg.push_str("</g>");
}

fn label_content(emoji: Option<&str>, name: &str) -> String {
    match emoji {
        Some(emoji) => format!(
            r#"<tspan>{}</tspan><tspan dx="0.5em">{}</tspan>"#,
            escape(emoji),
            escape(name)
        ),
        None => format!("<tspan>{}</tspan>", escape(name)),
    }
}

/// Escape text for XML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
