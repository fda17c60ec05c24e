//! Pan/zoom transform and fit-to-view

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 8.0;

/// Share of the viewport the fitted tree may occupy
pub const FIT_MARGIN: f64 = 0.9;

/// Axis-aligned rectangle in layout space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Bounds::new(x, y, right - x, bottom - y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Drawing area size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(960.0, 600.0)
    }
}

/// `screen = layout * k + (x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { x: 0.0, y: 0.0, k: 1.0 };

    /// Scale the bounds into the viewport (never enlarging past 1) and center them
    pub fn fit(bounds: &Bounds, viewport: &Viewport) -> Transform {
        if viewport.is_empty() {
            return Transform::IDENTITY;
        }

        let ratio = |available: f64, extent: f64| {
            if extent > 0.0 {
                available / extent
            } else {
                f64::INFINITY
            }
        };
        let fitted = ratio(viewport.width, bounds.width).min(ratio(viewport.height, bounds.height));
        let k = (fitted * FIT_MARGIN).min(1.0);

        let mid = bounds.center();
        Transform {
            x: viewport.width / 2.0 - k * mid.x,
            y: viewport.height / 2.0 - k * mid.y,
            k,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    pub fn apply_bounds(&self, b: &Bounds) -> Bounds {
        let origin = self.apply(Point::new(b.x, b.y));
        Bounds::new(origin.x, origin.y, b.width * self.k, b.height * self.k)
    }

    pub fn pan(&self, dx: f64, dy: f64) -> Transform {
        Transform {
            x: self.x + dx,
            y: self.y + dy,
            k: self.k,
        }
    }

    /// Multiply the scale by `factor` keeping the screen point `anchor` fixed
    pub fn zoom(&self, factor: f64, anchor: Point) -> Transform {
        if !(factor.is_finite() && factor > 0.0) {
            return *self;
        }
        let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
        let applied = k / self.k;
        Transform {
            x: anchor.x - (anchor.x - self.x) * applied,
            y: anchor.y - (anchor.y - self.y) * applied,
            k,
        }
    }

    /// SVG `transform` attribute value
    pub fn to_svg(&self) -> String {
        format!("translate({:.2},{:.2}) scale({:.4})", self.x, self.y, self.k)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
