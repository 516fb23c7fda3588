//! 2D Geometry Primitives
//!
//! Point math shared by every other algorithm in this crate.
//!
//! # Features
//!
//! - Euclidean distance
//! - Circumcircle through three points
//! - Orientation (turn direction) of three points
//! - Axis-aligned bounding box of a point set
//!
//! # Example
//!
//! ```rust
//! use fieldbot_library::algorithms::geometry::{circumcircle, distance};
//!
//! let circle = circumcircle((1.0, 0.0), (0.0, 1.0), (-1.0, 0.0));
//! assert!((circle.radius - 1.0).abs() < 1e-9);
//! assert!(distance(circle.center, (0.0, 0.0)) < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// A point in world coordinates (meters)
pub type Point2 = (f64, f64);

/// Values at or below this magnitude are replaced before dividing
const DENOMINATOR_EPSILON: f64 = 1e-5;

/// Lower end of the negative range that gets clamped to `-DENOMINATOR_EPSILON`
const NEGATIVE_CLAMP_FLOOR: f64 = -1e5;

/// Circle described by its center and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Distance from `point` to the circle outline
    pub fn outline_distance(&self, point: Point2) -> f64 {
        (distance(point, self.center) - self.radius).abs()
    }
}

/// Euclidean distance between two points
pub fn distance(p1: Point2, p2: Point2) -> f64 {
    let dx = p2.0 - p1.0;
    let dy = p2.1 - p1.1;
    dx.hypot(dy)
}

/// Circle passing through three points.
///
/// Collinear or nearly collinear points make the closed form divide by
/// (almost) zero. Any denominator in `(-1e5, 1e-5)` is replaced by `±1e-5`
/// with the matching sign, so the result is always finite: degenerate input
/// gives a very large circle rather than NaN or infinity.
pub fn circumcircle(p1: Point2, p2: Point2, p3: Point2) -> Circle {
    let (x1, y1) = p1;
    let (x2, y2) = p2;
    let (x3, y3) = p3;

    // Squared side lengths, each opposite the vertex it is named after
    let c = (x1 - x2).powi(2) + (y1 - y2).powi(2);
    let a = (x2 - x3).powi(2) + (y2 - y3).powi(2);
    let b = (x3 - x1).powi(2) + (y3 - y1).powi(2);

    let s = clamp_denominator(2.0 * (a * b + b * c + c * a) - (a * a + b * b + c * c));
    let px = (a * (b + c - a) * x1 + b * (c + a - b) * x2 + c * (a + b - c) * x3) / s;
    let py = (a * (b + c - a) * y1 + b * (c + a - b) * y2 + c * (a + b - c) * y3) / s;

    let ar = a.sqrt();
    let br = b.sqrt();
    let cr = c.sqrt();
    let den = clamp_denominator(
        (ar + br + cr) * (-ar + br + cr) * (ar - br + cr) * (ar + br - cr),
    );
    let radius = ar * br * cr / den.abs().sqrt();

    Circle::new((px, py), radius)
}

fn clamp_denominator(value: f64) -> f64 {
    if value > NEGATIVE_CLAMP_FLOOR && value < 0.0 {
        -DENOMINATOR_EPSILON
    } else if (0.0..DENOMINATOR_EPSILON).contains(&value) {
        DENOMINATOR_EPSILON
    } else {
        value
    }
}

/// Turn direction of the path `a -> b -> c`.
///
/// Positive for a clockwise turn, negative for counter-clockwise, zero when
/// the three points are collinear.
pub fn orientation(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.1 - a.1) * (c.0 - b.0) - (b.0 - a.0) * (c.1 - b.1)
}

/// Axis-aligned bounds of a point set as `(min, max)`, or `None` if empty
pub fn bounding_box(points: &[Point2]) -> Option<(Point2, Point2)> {
    let (first, rest) = points.split_first()?;
    let mut min = *first;
    let mut max = *first;
    for &(x, y) in rest {
        min.0 = min.0.min(x);
        min.1 = min.1.min(y);
        max.0 = max.0.max(x);
        max.1 = max.1.max(y);
    }
    Some((min, max))
}
