//! A* Pathfinding
//!
//! Best-first search over the occupancy grid's node graph.
//!
//! # Features
//!
//! - 8-connected movement over free cells
//! - Straight-line-to-goal scoring with a flat per-step cost of one cell
//! - Deterministic tie-breaking (equal scores expand in insertion order)
//! - Explicit "no path" result
//!
//! The search records predecessors in the grid's nodes. Call
//! [`OccupancyGrid::clear`] between searches; stale parents from a previous
//! run make cells look visited.
//!
//! # Example
//!
//! ```rust
//! use fieldbot_library::algorithms::astar::{find_path, path_length};
//! use fieldbot_library::algorithms::occupancy_grid::OccupancyGrid;
//!
//! let mut grid = OccupancyGrid::new(10.0, 10.0, 0.5, (0.0, 0.0)).unwrap();
//! grid.insert_rectangular_obstacle((-0.2, -3.0), (0.2, 3.0));
//!
//! if let Some(path) = find_path(&mut grid, (-3.0, 0.0), (3.0, 0.0)) {
//!     println!("{} waypoints, {:.2} m", path.len(), path_length(&path));
//! }
//! grid.clear();
//! ```

use super::geometry::{distance, Point2};
use super::occupancy_grid::{CellIndex, OccupancyGrid};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

mod tests;

/// Entry in the open set
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    score: f64,
    sequence: u64, // insertion order, breaks score ties
    cell: CellIndex,
}

impl Eq for QueueEntry {}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Plan a path between two world points.
///
/// Returns cell centers from the start cell to the goal cell (both
/// included), or `None` when either point is off the grid or the goal cannot
/// be reached.
pub fn find_path(grid: &mut OccupancyGrid, start: Point2, goal: Point2) -> Option<Vec<Point2>> {
    let start_cell = grid.get_cell(start)?;
    let goal_cell = grid.get_cell(goal)?;

    let cells = search(grid, start_cell, goal_cell)?;
    cells.into_iter().map(|cell| grid.position(cell)).collect()
}

/// Search from `start` to `goal` over free cells.
///
/// The start cell's own occupancy is ignored so a robot sitting inside a
/// dilated obstacle can still leave it. An occupied goal is unreachable.
pub fn search(grid: &mut OccupancyGrid, start: CellIndex, goal: CellIndex) -> Option<Vec<CellIndex>> {
    let goal_position = grid.position(goal)?;
    if !grid.is_valid(start) {
        return None;
    }
    let step_cost = grid.cell_resolution();

    // Self-parent marks the start as visited
    grid.set_parent(start, start);

    let mut queue = BinaryHeap::new();
    let mut sequence = 0u64;
    queue.push(QueueEntry {
        score: 0.0,
        sequence,
        cell: start,
    });

    while grid.parent(goal).is_none() {
        let Some(current) = queue.pop() else {
            break;
        };

        let neighbors = grid.neighbors(current.cell);
        let count = neighbors.len();
        let mut buffer = [current.cell; 8];
        buffer[..count].copy_from_slice(neighbors);

        for &neighbor in &buffer[..count] {
            let Some(node) = grid.node(neighbor) else {
                continue;
            };
            if node.parent().is_none() && !node.is_occupied() {
                let score = distance(node.position(), goal_position) + step_cost;
                grid.set_parent(neighbor, current.cell);
                sequence += 1;
                queue.push(QueueEntry {
                    score,
                    sequence,
                    cell: neighbor,
                });
            }
            if neighbor == goal {
                break;
            }
        }
    }

    reconstruct_path(grid, start, goal)
}

/// Walk parent links back from the goal
fn reconstruct_path(grid: &OccupancyGrid, start: CellIndex, goal: CellIndex) -> Option<Vec<CellIndex>> {
    grid.parent(goal)?;

    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = grid.parent(current)?;
        path.push(current);
        if path.len() > grid.num_cells() {
            // Parent links loop; the grid was not cleared since the last search
            return None;
        }
    }

    path.reverse();
    Some(path)
}

/// Total Euclidean length of a waypoint sequence
pub fn path_length(path: &[Point2]) -> f64 {
    path.windows(2).map(|w| distance(w[0], w[1])).sum()
}
