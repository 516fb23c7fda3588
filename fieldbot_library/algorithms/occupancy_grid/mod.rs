//! 2D Occupancy Grid
//!
//! Fixed-resolution grid of graph nodes covering a rectangle of the field.
//! The grid doubles as the search graph for [`crate::algorithms::astar`]:
//! every cell is a node wired to its 8-connected neighbors once, at
//! construction.
//!
//! # Features
//!
//! - Binary occupancy per cell
//! - Rectangle and convex polygon obstacle injection
//! - Obstacle dilation for the robot footprint
//! - World-to-cell lookup
//!
//! The grid is a per-cycle workspace: build it once, then `clear()` and
//! re-insert obstacles every control cycle instead of reallocating.
//!
//! # Example
//!
//! ```rust
//! use fieldbot_library::algorithms::occupancy_grid::OccupancyGrid;
//!
//! // 10m x 6m at 0.5m resolution, centered on the world origin
//! let mut grid = OccupancyGrid::new(10.0, 6.0, 0.5, (0.0, 0.0)).unwrap();
//!
//! grid.insert_rectangular_obstacle((1.0, 1.0), (2.0, 2.0));
//!
//! let cell = grid.get_cell((1.2, 1.2)).unwrap();
//! assert!(grid.is_occupied(cell));
//! ```

use super::geometry::Point2;
use super::polygon::Polygon;
use crate::error::{FieldbotError, FieldbotResult};
use std::collections::BTreeSet;

/// Column/row address of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIndex {
    pub col: usize,
    pub row: usize,
}

impl CellIndex {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Grid cell seen as a graph vertex
#[derive(Debug, Clone)]
pub struct Node {
    position: Point2,
    neighbors: Vec<CellIndex>,
    occupied: bool,
    parent: Option<CellIndex>,
}

impl Node {
    /// Cell center in world coordinates
    pub fn position(&self) -> Point2 {
        self.position
    }

    pub fn neighbors(&self) -> &[CellIndex] {
        &self.neighbors
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Search predecessor; `None` means unvisited
    pub fn parent(&self) -> Option<CellIndex> {
        self.parent
    }

    fn clear(&mut self) {
        self.occupied = false;
        self.parent = None;
    }
}

/// 2D Occupancy Grid
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: f64,           // meters
    height: f64,          // meters
    cell_resolution: f64, // meters per cell
    origin: Point2,       // world position of the grid center
    num_cols: usize,
    num_rows: usize,
    nodes: Vec<Node>, // column-major: col * num_rows + row
    dilation_scratch: Vec<bool>,
}

/// Neighbor offsets in wiring order: orthogonal first, then diagonal
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

impl OccupancyGrid {
    /// Create new occupancy grid
    ///
    /// # Arguments
    /// * `width` - Grid width in meters
    /// * `height` - Grid height in meters
    /// * `cell_resolution` - Cell size in meters; should divide width and height evenly
    /// * `origin` - World position of the grid center
    pub fn new(
        width: f64,
        height: f64,
        cell_resolution: f64,
        origin: Point2,
    ) -> FieldbotResult<Self> {
        if !(cell_resolution.is_finite() && cell_resolution > 0.0) {
            return Err(FieldbotError::invalid_grid(format!(
                "cell resolution must be positive, got {}",
                cell_resolution
            )));
        }
        if !(width.is_finite() && height.is_finite() && origin.0.is_finite() && origin.1.is_finite())
        {
            return Err(FieldbotError::invalid_grid(
                "width, height and origin must be finite",
            ));
        }

        let num_cols = cell_count(width, cell_resolution);
        let num_rows = cell_count(height, cell_resolution);
        if num_cols == 0 || num_rows == 0 {
            return Err(FieldbotError::invalid_grid(format!(
                "{}m x {}m holds no {}m cells",
                width, height, cell_resolution
            )));
        }

        // 1. Create all the nodes
        let mut nodes = Vec::with_capacity(num_cols * num_rows);
        for col in 0..num_cols {
            for row in 0..num_rows {
                let x = origin.0 + col as f64 * cell_resolution - width / 2.0
                    + cell_resolution / 2.0;
                let y = origin.1 + row as f64 * cell_resolution - height / 2.0
                    + cell_resolution / 2.0;
                nodes.push(Node {
                    position: (x, y),
                    neighbors: Vec::with_capacity(8),
                    occupied: false,
                    parent: None,
                });
            }
        }

        let mut grid = Self {
            width,
            height,
            cell_resolution,
            origin,
            num_cols,
            num_rows,
            nodes,
            dilation_scratch: Vec::new(),
        };

        // 2. Connect all the neighbors
        for col in 0..num_cols {
            for row in 0..num_rows {
                let neighbors: Vec<CellIndex> = NEIGHBOR_OFFSETS
                    .iter()
                    .filter_map(|&(dc, dr)| grid.offset(CellIndex::new(col, row), dc, dr))
                    .collect();
                let idx = grid.index(CellIndex::new(col, row));
                grid.nodes[idx].neighbors = neighbors;
            }
        }

        Ok(grid)
    }

    /// Mark every cell covered by the rectangle `min..=max` as occupied.
    ///
    /// Rectangles partially outside the grid are clipped; rectangles fully
    /// outside leave the grid untouched.
    pub fn insert_rectangular_obstacle(&mut self, min: Point2, max: Point2) {
        if ![min.0, min.1, max.0, max.1].iter().all(|v| v.is_finite()) {
            return;
        }

        let min_col = self.column_of(min.0);
        let max_col = self.column_of(max.0);
        let min_row = self.row_of(min.1);
        let max_row = self.row_of(max.1);

        let Some((first_col, last_col)) = clip_range(min_col, max_col, self.num_cols) else {
            return;
        };
        let Some((first_row, last_row)) = clip_range(min_row, max_row, self.num_rows) else {
            return;
        };

        for col in first_col..=last_col {
            for row in first_row..=last_row {
                let idx = self.index(CellIndex::new(col, row));
                self.nodes[idx].occupied = true;
            }
        }
    }

    /// Insert a batch of `(min, max)` rectangles
    pub fn insert_rectangular_obstacles(&mut self, obstacles: &[(Point2, Point2)]) {
        for &(min, max) in obstacles {
            self.insert_rectangular_obstacle(min, max);
        }
    }

    /// Rasterize a convex polygon into the grid.
    ///
    /// Each column is a vertical scanline through the column centers. The
    /// cells where polygon edges cross the scanline are contact cells. With
    /// exactly one contact cell (a vertex grazing the scanline) only that cell
    /// is marked. Otherwise the column is swept bottom to top with an
    /// even-odd fill between contact cells. Existing occupancy is kept.
    pub fn insert_convex_polygon(&mut self, polygon: &Polygon) {
        if polygon.vertices().is_empty() {
            return;
        }

        let mut contact_rows = BTreeSet::new();
        for col in 0..self.num_cols {
            let col_x = self.nodes[self.index(CellIndex::new(col, 0))].position.0;

            contact_rows.clear();
            for (p1, p2) in polygon.edges() {
                let straddles =
                    (p1.0 <= col_x && col_x <= p2.0) || (p2.0 <= col_x && col_x <= p1.0);
                if !straddles {
                    continue;
                }

                if p1.0 == p2.0 {
                    // Vertical edge on the scanline: both ends touch it
                    for y in [p1.1, p2.1] {
                        if let Some(cell) = self.get_cell((col_x, y)) {
                            contact_rows.insert(cell.row);
                        }
                    }
                } else {
                    let slope = (p2.1 - p1.1) / (p2.0 - p1.0);
                    let y = slope * (col_x - p1.0) + p1.1;
                    if let Some(cell) = self.get_cell((col_x, y)) {
                        contact_rows.insert(cell.row);
                    }
                }
            }

            if contact_rows.len() == 1 {
                if let Some(&row) = contact_rows.iter().next() {
                    let idx = self.index(CellIndex::new(col, row));
                    self.nodes[idx].occupied = true;
                }
                continue;
            }

            let mut inside = false;
            for row in 0..self.num_rows {
                let idx = self.index(CellIndex::new(col, row));
                let node = &mut self.nodes[idx];
                node.occupied = inside || node.occupied;
                if contact_rows.contains(&row) {
                    node.occupied = true;
                    inside = !inside;
                }
            }
        }
    }

    /// Grow occupied regions by `kernel_size` cells in every direction.
    ///
    /// Uses a square (Chebyshev) kernel applied to a snapshot of the current
    /// occupancy, so growth never cascades within one call.
    pub fn dilate(&mut self, kernel_size: usize) {
        if kernel_size == 0 {
            return;
        }

        let mut snapshot = std::mem::take(&mut self.dilation_scratch);
        snapshot.clear();
        snapshot.extend(self.nodes.iter().map(|node| node.occupied));

        for col in 0..self.num_cols {
            for row in 0..self.num_rows {
                if !snapshot[col * self.num_rows + row] {
                    continue;
                }
                let last_col = (col + kernel_size).min(self.num_cols - 1);
                let last_row = (row + kernel_size).min(self.num_rows - 1);
                for c in col.saturating_sub(kernel_size)..=last_col {
                    for r in row.saturating_sub(kernel_size)..=last_row {
                        let idx = self.index(CellIndex::new(c, r));
                        self.nodes[idx].occupied = true;
                    }
                }
            }
        }

        self.dilation_scratch = snapshot;
    }

    /// Cell containing the world point, or `None` outside
    /// `[origin - extent/2, origin + extent/2)` on either axis.
    ///
    /// The extent is the area the cells cover, `num_cols * cell_resolution`
    /// wide. Lookups use the same column mapping as obstacle insertion.
    pub fn get_cell(&self, point: Point2) -> Option<CellIndex> {
        let (x, y) = point;
        let half_width = self.num_cols as f64 * self.cell_resolution / 2.0;
        let half_height = self.num_rows as f64 * self.cell_resolution / 2.0;
        let min_x = self.origin.0 - half_width;
        let max_x = self.origin.0 + half_width;
        let min_y = self.origin.1 - half_height;
        let max_y = self.origin.1 + half_height;

        if !(min_x <= x && x < max_x && min_y <= y && y < max_y) {
            return None;
        }

        // Rounding at the edges can land one past the last cell
        let col = self.column_of(x).clamp(0, self.num_cols as i64 - 1) as usize;
        let row = self.row_of(y).clamp(0, self.num_rows as i64 - 1) as usize;
        Some(CellIndex::new(col, row))
    }

    /// Mark all cells free and forget all search parents
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.clear();
        }
    }

    /// Node at `cell`
    pub fn node(&self, cell: CellIndex) -> Option<&Node> {
        self.is_valid(cell).then(|| &self.nodes[self.index(cell)])
    }

    /// Cell center in world coordinates
    pub fn position(&self, cell: CellIndex) -> Option<Point2> {
        self.node(cell).map(Node::position)
    }

    /// Check if cell is occupied (out of bounds counts as occupied)
    pub fn is_occupied(&self, cell: CellIndex) -> bool {
        self.node(cell).map_or(true, Node::is_occupied)
    }

    /// Set or reset occupancy of a single cell
    pub fn set_occupied(&mut self, cell: CellIndex, occupied: bool) {
        if self.is_valid(cell) {
            let idx = self.index(cell);
            self.nodes[idx].occupied = occupied;
        }
    }

    pub fn neighbors(&self, cell: CellIndex) -> &[CellIndex] {
        match self.node(cell) {
            Some(node) => node.neighbors(),
            None => &[],
        }
    }

    pub fn parent(&self, cell: CellIndex) -> Option<CellIndex> {
        self.node(cell).and_then(Node::parent)
    }

    pub(crate) fn set_parent(&mut self, cell: CellIndex, parent: CellIndex) {
        if self.is_valid(cell) {
            let idx = self.index(cell);
            self.nodes[idx].parent = Some(parent);
        }
    }

    /// All cells in column-major order
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        (0..self.num_cols)
            .flat_map(move |col| (0..self.num_rows).map(move |row| CellIndex::new(col, row)))
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.occupied).count()
    }

    /// Check if cell indices are inside the grid
    pub fn is_valid(&self, cell: CellIndex) -> bool {
        cell.col < self.num_cols && cell.row < self.num_rows
    }

    /// Column-major position of a cell, used as a stable total order
    pub fn linear_index(&self, cell: CellIndex) -> usize {
        self.index(cell)
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cells(&self) -> usize {
        self.nodes.len()
    }

    pub fn cell_resolution(&self) -> f64 {
        self.cell_resolution
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn origin(&self) -> Point2 {
        self.origin
    }

    fn index(&self, cell: CellIndex) -> usize {
        cell.col * self.num_rows + cell.row
    }

    fn offset(&self, cell: CellIndex, dc: isize, dr: isize) -> Option<CellIndex> {
        let col = cell.col.checked_add_signed(dc)?;
        let row = cell.row.checked_add_signed(dr)?;
        let neighbor = CellIndex::new(col, row);
        self.is_valid(neighbor).then_some(neighbor)
    }

    fn column_of(&self, x: f64) -> i64 {
        ((x - self.origin.0) / self.cell_resolution + self.num_cols as f64 / 2.0).floor() as i64
    }

    fn row_of(&self, y: f64) -> i64 {
        ((y - self.origin.1) / self.cell_resolution + self.num_rows as f64 / 2.0).floor() as i64
    }
}

/// Relative slack when deciding that an extent holds a whole number of cells
pub const EXTENT_TOLERANCE: f64 = 1e-9;

/// Check whether `cell_resolution` divides `extent` into whole cells
pub fn divides_evenly(extent: f64, cell_resolution: f64) -> bool {
    let cells = extent / cell_resolution;
    let nearest = cells.round();
    (cells - nearest).abs() <= EXTENT_TOLERANCE * nearest.max(1.0)
}

/// Whole cells along `extent`; a quotient within tolerance of an integer
/// counts as that integer so 4.6m at 0.2m gives 23 cells, not 22
fn cell_count(extent: f64, cell_resolution: f64) -> usize {
    let cells = extent / cell_resolution;
    if divides_evenly(extent, cell_resolution) {
        cells.round().max(0.0) as usize
    } else {
        cells.floor().max(0.0) as usize
    }
}

/// Clamp an inclusive index range to `0..len`, or `None` if nothing overlaps
fn clip_range(first: i64, last: i64, len: usize) -> Option<(usize, usize)> {
    let max = len as i64 - 1;
    if last < 0 || first > max || first > last {
        return None;
    }
    Some((first.max(0) as usize, last.min(max) as usize))
}
