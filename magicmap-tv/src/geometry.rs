//! Points and link curves in layout space
//!
//! Layout space is horizontal: `x` grows with depth, `y` with breadth.

use magicmap_common::easing::lerp;
use serde::Serialize;

/// Segments used to approximate curve length and rasterize curves
pub const CURVE_SEGMENTS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Point, progress: f64) -> Point {
        Point::new(lerp(self.x, to.x, progress), lerp(self.y, to.y, progress))
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Cubic Bézier from a parent to a child with horizontal tangents at both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkCurve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl LinkCurve {
    pub fn horizontal(from: Point, to: Point) -> Self {
        let mid_x = (from.x + to.x) / 2.0;
        Self {
            start: from,
            control1: Point::new(mid_x, from.y),
            control2: Point::new(mid_x, to.y),
            end: to,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }

    /// Polyline approximation with `segments + 1` points
    pub fn flatten(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    /// Approximate arc length
    pub fn length(&self) -> f64 {
        self.flatten(CURVE_SEGMENTS)
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// SVG path data: `M x0,y0 C c1 c2 x1,y1`
    pub fn to_path_data(&self) -> String {
        format!(
            "M{:.2},{:.2}C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}
