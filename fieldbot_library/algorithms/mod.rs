//! Pure geometric algorithms for the field robot
//!
//! This module contains pure algorithmic implementations with no I/O and no
//! logging. Every operation runs to completion on the caller's thread; absent
//! results (point off the grid, no path, no circle) come back as `None`.
//!
//! # Available Algorithms
//!
//! ## Primitives
//! - **geometry**: distance, circumcircle, orientation, bounding box
//! - **polygon**: convex polygon obstacles with buffer growth
//!
//! ## Mapping & Motion Planning
//! - **occupancy_grid**: 2D grid of graph nodes with obstacle rasterization
//! - **astar**: best-first search over the occupancy grid
//!
//! ## Perception
//! - **clustering**: spatial hashing and connected components of buckets
//! - **circle_fit**: RANSAC circle detection with an explicit seed

pub mod astar;
pub mod circle_fit;
pub mod clustering;
pub mod geometry;
pub mod occupancy_grid;
pub mod polygon;
