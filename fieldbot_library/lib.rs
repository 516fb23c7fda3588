//! # FIELDBOT Library
//!
//! Geometric reasoning core of a mobile field robot: occupancy grid, path
//! search, polygon rasterization, bucketed clustering and RANSAC circle
//! detection, plus the thin perception and planning layers that drive them
//! once per control cycle.
//!
//! ## Structure
//!
//! ```text
//! fieldbot_library/
//! ── algorithms/     # Pure geometry: grid, A*, polygons, clustering, circle fit
//! ── perception.rs   # Sensor points -> detected circles
//! ── planning.rs     # Per-cycle obstacle injection and path search
//! ── config.rs       # TOML / YAML configuration
//! ── error.rs        # FieldbotError
//! ── tools/          # plan_runner (offline cycle runner)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use fieldbot_library::prelude::*;
//!
//! let config = FieldbotConfig::default();
//! let perception = Perception::new(&config.perception);
//! let mut planner = MotionPlanner::from_config(&config).unwrap();
//!
//! let circles = perception.detect(&[]);
//! let outcome = planner.plan_to_nearest((0.0, 0.0), &circles, &[]);
//! assert!(outcome.trajectory.is_none());
//!
//! let outcome = planner.plan((0.0, 0.0), Some((2.0, 1.0)), &[((0.5, -0.5), (1.0, 0.5))]);
//! assert!(outcome.trajectory.is_some());
//! ```

pub mod algorithms;
pub mod config;
pub mod error;
pub mod perception;
pub mod planning;

// Re-export the most used types at the crate root for convenience
pub use algorithms::astar::{find_path, path_length};
pub use algorithms::circle_fit::{fit_circle, CircleFitter};
pub use algorithms::clustering::{bucket_points, cluster_points, BucketId};
pub use algorithms::geometry::{Circle, Point2};
pub use algorithms::occupancy_grid::{CellIndex, OccupancyGrid};
pub use algorithms::polygon::Polygon;
pub use config::FieldbotConfig;
pub use error::{FieldbotError, FieldbotResult};
pub use perception::Perception;
pub use planning::{MotionPlanner, PlanOutcome};

/// Prelude module for convenient imports
///
/// # Usage
/// ```rust
/// use fieldbot_library::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use crate::algorithms::geometry::{
        bounding_box, circumcircle, distance, orientation, Circle, Point2,
    };
    pub use crate::algorithms::polygon::Polygon;

    // Grid and search
    pub use crate::algorithms::astar::{find_path, path_length};
    pub use crate::algorithms::occupancy_grid::{CellIndex, OccupancyGrid};

    // Detection
    pub use crate::algorithms::circle_fit::{fit_circle, CircleFitter};
    pub use crate::algorithms::clustering::{bucket_points, cluster_points};

    // Control cycle
    pub use crate::config::{FieldbotConfig, GridConfig, PerceptionConfig, PlanningConfig};
    pub use crate::error::{FieldbotError, FieldbotResult};
    pub use crate::perception::Perception;
    pub use crate::planning::{MotionPlanner, PlanOutcome};
}
