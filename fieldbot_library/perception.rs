//! Object detection from range-sensor points
//!
//! Points are hashed into buckets, buckets are merged into clusters, and a
//! RANSAC circle is fitted to every cluster. Circles outside the configured
//! radius range are dropped.

use crate::algorithms::circle_fit::CircleFitter;
use crate::algorithms::clustering::{bucket_points, cluster_points};
use crate::algorithms::geometry::{Circle, Point2};
use crate::config::PerceptionConfig;
use tracing::debug;

/// Circle detector built from [`PerceptionConfig`]
#[derive(Debug, Clone)]
pub struct Perception {
    bucket_size: f64,
    fitter: CircleFitter,
    min_radius: f64,
    max_radius: f64,
}

impl Perception {
    pub fn new(config: &PerceptionConfig) -> Self {
        Self {
            bucket_size: config.bucket_size,
            fitter: CircleFitter::new(config.consensus, config.tolerance, config.max_iterations)
                .with_seed(config.seed),
            min_radius: config.min_radius,
            max_radius: config.max_radius,
        }
    }

    /// Detect circles in one sensor sweep.
    ///
    /// Circles come out in cluster order (ascending smallest bucket id).
    /// Clusters with fewer than three points or without a consensus circle
    /// produce nothing.
    pub fn detect(&self, points: &[Point2]) -> Vec<Circle> {
        let buckets = bucket_points(points, self.bucket_size);
        let clusters = cluster_points(&buckets);

        let circles: Vec<Circle> = clusters
            .iter()
            .filter_map(|cluster| self.fitter.fit(cluster))
            .filter(|circle| self.accepts(circle))
            .collect();

        debug!(
            points = points.len(),
            buckets = buckets.len(),
            clusters = clusters.len(),
            circles = circles.len(),
            "perception cycle"
        );
        circles
    }

    fn accepts(&self, circle: &Circle) -> bool {
        circle.radius.is_finite()
            && circle.radius >= self.min_radius
            && circle.radius <= self.max_radius
    }
}
