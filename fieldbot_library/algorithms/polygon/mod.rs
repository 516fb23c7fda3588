//! Convex Polygon Obstacles
//!
//! Polygons describe static field elements that get rasterized into the
//! occupancy grid every planning cycle.
//!
//! # Features
//!
//! - Convexity check
//! - Point containment for convex polygons
//! - Scaling about the centroid
//! - Radial buffer growth (footprint margin)
//!
//! # Example
//!
//! ```rust
//! use fieldbot_library::algorithms::polygon::Polygon;
//!
//! let mut square = Polygon::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
//! assert!(square.is_convex());
//! assert!(square.contains_point((0.5, 0.5)));
//!
//! square.grow_by_buffer(0.2);
//! assert!(square.contains_point((1.05, 0.5)));
//! ```

use super::geometry::{distance, orientation, Point2};
use serde::{Deserialize, Serialize};

/// Polygon with vertices in counter-clockwise order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Point2>", into = "Vec<Point2>")]
pub struct Polygon {
    vertices: Vec<Point2>,
    center: Point2, // vertex average
    convex: bool,
}

impl Polygon {
    /// Create polygon from counter-clockwise vertices
    pub fn new(vertices: Vec<Point2>) -> Self {
        let center = vertex_average(&vertices);
        let convex = check_convex(&vertices);
        Self {
            vertices,
            center,
            convex,
        }
    }

    /// Vertices in counter-clockwise order
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// Average of the vertices
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// True when walking the vertices never makes a clockwise turn
    pub fn is_convex(&self) -> bool {
        self.convex
    }

    /// Check whether `point` lies inside the polygon or on its boundary.
    ///
    /// Only meaningful for convex polygons; check [`Polygon::is_convex`]
    /// first. On a concave polygon the answer is unspecified.
    pub fn contains_point(&self, point: Point2) -> bool {
        self.edges().all(|(p1, p2)| orientation(p1, p2, point) <= 0.0)
    }

    /// Scale all vertices about the centroid by `factor`
    pub fn scale(&mut self, factor: f64) {
        let (cx, cy) = self.center;
        for vertex in &mut self.vertices {
            vertex.0 = (vertex.0 - cx) * factor + cx;
            vertex.1 = (vertex.1 - cy) * factor + cy;
        }
        self.refresh();
    }

    /// Push every vertex `buffer` meters further away from the centroid.
    ///
    /// A vertex sitting exactly on the centroid has no outward direction and
    /// stays where it is.
    pub fn grow_by_buffer(&mut self, buffer: f64) {
        let center = self.center;
        for vertex in &mut self.vertices {
            let current = distance(*vertex, center);
            if current == 0.0 {
                continue;
            }
            let factor = (current + buffer) / current;
            vertex.0 = (vertex.0 - center.0) * factor + center.0;
            vertex.1 = (vertex.1 - center.1) * factor + center.1;
        }
        self.refresh();
    }

    /// Edges as `(previous vertex, vertex)` pairs, starting with the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[(i + n - 1) % n], self.vertices[i]))
    }

    fn refresh(&mut self) {
        self.center = vertex_average(&self.vertices);
        self.convex = check_convex(&self.vertices);
    }
}

impl From<Vec<Point2>> for Polygon {
    fn from(vertices: Vec<Point2>) -> Self {
        Polygon::new(vertices)
    }
}

impl From<Polygon> for Vec<Point2> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

fn vertex_average(vertices: &[Point2]) -> Point2 {
    if vertices.is_empty() {
        return (0.0, 0.0);
    }
    let n = vertices.len() as f64;
    let (sx, sy) = vertices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
    (sx / n, sy / n)
}

fn check_convex(vertices: &[Point2]) -> bool {
    let n = vertices.len();
    (0..n).all(|i| {
        let p1 = vertices[(i + 2 * n - 2) % n];
        let p2 = vertices[(i + n - 1) % n];
        let p3 = vertices[i];
        orientation(p1, p2, p3) <= 0.0
    })
}
