//! Per-cycle motion planning
//!
//! One [`OccupancyGrid`] is built when the planner is created and reused every
//! control cycle: clear it, rasterize the static field elements, add the
//! dynamic obstacles seen this cycle, dilate for the robot footprint, then
//! search.

use crate::algorithms::astar::{find_path, path_length};
use crate::algorithms::geometry::{distance, Circle, Point2};
use crate::algorithms::occupancy_grid::OccupancyGrid;
use crate::algorithms::polygon::Polygon;
use crate::config::{FieldbotConfig, GridConfig, PlanningConfig};
use crate::error::{FieldbotError, FieldbotResult};
use serde::Serialize;
use tracing::{debug, warn};

/// Result of one planning cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutcome {
    /// Goal the search aimed for, if any
    pub goal: Option<Point2>,

    /// Cell centers from the robot to the goal; `None` when there was no
    /// goal or it could not be reached
    pub trajectory: Option<Vec<Point2>>,

    /// Occupied cells after obstacle injection and dilation
    pub occupied_cells: usize,
}

/// Motion planner owning the reusable grid
#[derive(Debug, Clone)]
pub struct MotionPlanner {
    grid: OccupancyGrid,
    static_obstacles: Vec<Polygon>,
    dilation_kernel_size: usize,
}

impl MotionPlanner {
    /// Create planner; static obstacles are grown by the configured buffer once
    pub fn new(grid: &GridConfig, planning: &PlanningConfig) -> FieldbotResult<Self> {
        if !(planning.obstacle_buffer >= 0.0) {
            return Err(FieldbotError::InvalidParameter(format!(
                "obstacle buffer must not be negative, got {}",
                planning.obstacle_buffer
            )));
        }

        let occupancy = OccupancyGrid::new(grid.width, grid.height, grid.cell_resolution, grid.origin)?;

        let static_obstacles = planning
            .static_obstacles
            .iter()
            .cloned()
            .map(|mut polygon| {
                if planning.obstacle_buffer > 0.0 {
                    polygon.grow_by_buffer(planning.obstacle_buffer);
                }
                polygon
            })
            .collect();

        Ok(Self {
            grid: occupancy,
            static_obstacles,
            dilation_kernel_size: grid.dilation_kernel_size,
        })
    }

    pub fn from_config(config: &FieldbotConfig) -> FieldbotResult<Self> {
        Self::new(&config.grid, &config.planning)
    }

    /// Plan from `pose` to `goal` around this cycle's obstacles.
    ///
    /// The grid is rebuilt even without a goal so `occupied_cells` and
    /// [`MotionPlanner::grid`] always reflect the current cycle.
    pub fn plan(
        &mut self,
        pose: Point2,
        goal: Option<Point2>,
        dynamic_obstacles: &[(Point2, Point2)],
    ) -> PlanOutcome {
        let occupied_cells = self.update_grid(dynamic_obstacles);
        let trajectory = goal.and_then(|goal| self.search(pose, goal));

        PlanOutcome {
            goal,
            trajectory,
            occupied_cells,
        }
    }

    /// Plan toward the nearest reachable-looking circle.
    ///
    /// The goal is the center of the circle closest to `pose` whose center
    /// falls in a free cell of this cycle's grid.
    pub fn plan_to_nearest(
        &mut self,
        pose: Point2,
        circles: &[Circle],
        dynamic_obstacles: &[(Point2, Point2)],
    ) -> PlanOutcome {
        let occupied_cells = self.update_grid(dynamic_obstacles);
        let goal = self.nearest_free_center(pose, circles);
        let trajectory = goal.and_then(|goal| self.search(pose, goal));

        PlanOutcome {
            goal,
            trajectory,
            occupied_cells,
        }
    }

    /// Reset the grid and inject static and dynamic obstacles.
    ///
    /// Returns the number of occupied cells after dilation.
    pub fn update_grid(&mut self, dynamic_obstacles: &[(Point2, Point2)]) -> usize {
        self.grid.clear();
        for polygon in &self.static_obstacles {
            self.grid.insert_convex_polygon(polygon);
        }
        self.grid.insert_rectangular_obstacles(dynamic_obstacles);
        self.grid.dilate(self.dilation_kernel_size);

        let occupied = self.grid.occupied_count();
        debug!(
            static_obstacles = self.static_obstacles.len(),
            dynamic_obstacles = dynamic_obstacles.len(),
            occupied,
            "grid updated"
        );
        occupied
    }

    /// Center of the nearest circle lying in a free cell of the current grid
    pub fn nearest_free_center(&self, pose: Point2, circles: &[Circle]) -> Option<Point2> {
        circles
            .iter()
            .map(|circle| circle.center)
            .filter(|&center| {
                self.grid
                    .get_cell(center)
                    .is_some_and(|cell| !self.grid.is_occupied(cell))
            })
            .min_by(|&a, &b| distance(pose, a).total_cmp(&distance(pose, b)))
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Static obstacles after buffer growth
    pub fn static_obstacles(&self) -> &[Polygon] {
        &self.static_obstacles
    }

    fn search(&mut self, pose: Point2, goal: Point2) -> Option<Vec<Point2>> {
        if self.grid.get_cell(pose).is_none() {
            warn!(x = pose.0, y = pose.1, "robot pose is outside the grid");
            return None;
        }
        if self.grid.get_cell(goal).is_none() {
            warn!(x = goal.0, y = goal.1, "goal is outside the grid");
            return None;
        }

        let trajectory = find_path(&mut self.grid, pose, goal);
        match &trajectory {
            Some(path) => debug!(
                waypoints = path.len(),
                length = path_length(path),
                "path found"
            ),
            None => debug!(goal_x = goal.0, goal_y = goal.1, "no path to goal"),
        }
        trajectory
    }
}
