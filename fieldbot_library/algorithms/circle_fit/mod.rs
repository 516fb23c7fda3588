//! RANSAC Circle Fitting
//!
//! Detects round objects (balls, posts) in a cluster of range-sensor points.
//!
//! # Features
//!
//! - Three-point circle hypotheses from random samples
//! - Inlier consensus against a distance tolerance
//! - Reproducible: the random generator is seeded explicitly
//!
//! Every call restarts the generator from the configured seed, so identical
//! points and parameters always give the identical circle.
//!
//! # Example
//!
//! ```rust
//! use fieldbot_library::algorithms::circle_fit::CircleFitter;
//!
//! let points: Vec<(f64, f64)> = (0..12)
//!     .map(|i| {
//!         let theta = i as f64 * 0.5;
//!         (1.0 + 0.2 * theta.cos(), -2.0 + 0.2 * theta.sin())
//!     })
//!     .collect();
//!
//! let fitter = CircleFitter::new(0.8, 0.01, 30);
//! let circle = fitter.fit(&points).unwrap();
//! assert!((circle.radius - 0.2).abs() < 1e-6);
//! ```

use super::geometry::{circumcircle, Circle, Point2};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 10;

/// RANSAC circle fitter
#[derive(Debug, Clone)]
pub struct CircleFitter {
    consensus: f64, // required inlier fraction, 0 < consensus <= 1
    tolerance: f64, // meters from the outline
    max_iterations: usize,
    seed: u64,
}

impl CircleFitter {
    /// Create new fitter
    ///
    /// # Arguments
    /// * `consensus` - Fraction of points that must be inliers, in (0, 1]
    /// * `tolerance` - Max distance from the circle outline for an inlier (m)
    /// * `max_iterations` - Number of hypotheses to try before giving up
    pub fn new(consensus: f64, tolerance: f64, max_iterations: usize) -> Self {
        Self {
            consensus,
            tolerance,
            max_iterations,
            seed: DEFAULT_SEED,
        }
    }

    /// Set the random seed
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fit a circle, restarting the generator from the configured seed
    pub fn fit(&self, points: &[Point2]) -> Option<Circle> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.fit_with_rng(points, &mut rng)
    }

    /// Fit a circle drawing samples from a caller-owned generator.
    ///
    /// Returns the first hypothesis whose inlier fraction reaches the
    /// consensus, or `None` with fewer than three points or when every
    /// iteration falls short.
    pub fn fit_with_rng<R: Rng + ?Sized>(&self, points: &[Point2], rng: &mut R) -> Option<Circle> {
        let n = points.len();
        if n < 3 {
            return None;
        }

        for _ in 0..self.max_iterations {
            // 1. Sample three distinct points
            let sample = index::sample(rng, n, 3);
            let candidate = circumcircle(
                points[sample.index(0)],
                points[sample.index(1)],
                points[sample.index(2)],
            );

            // 2. Count points near the outline
            let inliers = points
                .iter()
                .filter(|&&point| candidate.outline_distance(point) <= self.tolerance)
                .count();

            // 3. First hypothesis with enough support wins
            if inliers as f64 / n as f64 >= self.consensus {
                return Some(candidate);
            }
        }

        None
    }
}

/// Fit a circle with an explicit seed
pub fn fit_circle(
    points: &[Point2],
    consensus: f64,
    tolerance: f64,
    max_iterations: usize,
    seed: u64,
) -> Option<Circle> {
    CircleFitter::new(consensus, tolerance, max_iterations)
        .with_seed(seed)
        .fit(points)
}
