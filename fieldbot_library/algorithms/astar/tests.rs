#[cfg(test)]
mod tests {
    use super::super::{find_path, path_length, search, QueueEntry};
    use crate::algorithms::occupancy_grid::{CellIndex, OccupancyGrid};
    use approx::assert_relative_eq;
    use std::collections::BinaryHeap;

    /// 10m x 10m at 1m resolution: cell (c, r) has center (c - 4.5, r - 4.5)
    fn open_grid() -> OccupancyGrid {
        OccupancyGrid::new(10.0, 10.0, 1.0, (0.0, 0.0)).unwrap()
    }

    fn assert_connected(grid: &OccupancyGrid, path: &[CellIndex]) {
        for pair in path.windows(2) {
            assert!(
                grid.neighbors(pair[0]).contains(&pair[1]),
                "{:?} and {:?} are not neighbors",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_open_grid_path() {
        let mut grid = open_grid();
        let start = (-4.5, -4.5);
        let goal = (4.5, 4.5);

        let path = find_path(&mut grid, start, goal).unwrap();

        assert_eq!(path[0], start);
        assert_eq!(path[path.len() - 1], goal);
        // Open space: straight diagonal
        assert_eq!(path.len(), 10);
        assert_relative_eq!(path_length(&path), 9.0 * 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_path_endpoints_are_cell_centers() {
        let mut grid = open_grid();

        let path = find_path(&mut grid, (-3.9, 0.2), (2.1, -1.7)).unwrap();

        assert_eq!(path[0], (-3.5, 0.5));
        assert_eq!(path[path.len() - 1], (2.5, -1.5));
    }

    #[test]
    fn test_consecutive_cells_are_neighbors() {
        let mut grid = open_grid();

        let path = search(&mut grid, CellIndex::new(1, 8), CellIndex::new(9, 0)).unwrap();

        assert_eq!(path[0], CellIndex::new(1, 8));
        assert_eq!(path[path.len() - 1], CellIndex::new(9, 0));
        assert_connected(&grid, &path);
    }

    #[test]
    fn test_start_equals_goal() {
        let mut grid = open_grid();

        let path = find_path(&mut grid, (0.5, 0.5), (0.5, 0.5)).unwrap();
        assert_eq!(path, vec![(0.5, 0.5)]);
    }

    #[test]
    fn test_path_around_wall() {
        let mut grid = OccupancyGrid::new(20.0, 20.0, 1.0, (0.0, 0.0)).unwrap();
        // Vertical wall in column 10 with a gap at rows 7..=12
        for row in (0..7).chain(13..20) {
            grid.set_occupied(CellIndex::new(10, row), true);
        }

        let path = search(&mut grid, CellIndex::new(0, 10), CellIndex::new(19, 10)).unwrap();

        assert_connected(&grid, &path);
        assert!(path.iter().all(|&cell| !grid.is_occupied(cell)));
        assert!(path
            .iter()
            .any(|cell| cell.col == 10 && (7..=12).contains(&cell.row)));
    }

    #[test]
    fn test_no_path_through_complete_wall() {
        let mut grid = open_grid();
        grid.insert_rectangular_obstacle((0.1, -5.0), (0.9, 4.9));

        assert!(find_path(&mut grid, (-3.0, 0.0), (3.0, 0.0)).is_none());
    }

    #[test]
    fn test_occupied_goal() {
        let mut grid = open_grid();
        grid.set_occupied(CellIndex::new(8, 8), true);

        assert!(search(&mut grid, CellIndex::new(0, 0), CellIndex::new(8, 8)).is_none());
    }

    #[test]
    fn test_isolated_goal() {
        let mut grid = open_grid();
        let goal = CellIndex::new(5, 5);
        let ring: Vec<CellIndex> = grid.neighbors(goal).to_vec();
        for cell in ring {
            grid.set_occupied(cell, true);
        }

        assert!(search(&mut grid, CellIndex::new(0, 0), goal).is_none());
    }

    #[test]
    fn test_occupied_start_is_left() {
        let mut grid = open_grid();
        grid.set_occupied(CellIndex::new(2, 2), true);

        let path = search(&mut grid, CellIndex::new(2, 2), CellIndex::new(7, 2)).unwrap();
        assert_eq!(path[0], CellIndex::new(2, 2));
        assert!(path[1..].iter().all(|&cell| !grid.is_occupied(cell)));
    }

    #[test]
    fn test_off_grid_endpoints() {
        let mut grid = open_grid();

        assert!(find_path(&mut grid, (-50.0, 0.0), (0.0, 0.0)).is_none());
        grid.clear();
        assert!(find_path(&mut grid, (0.0, 0.0), (5.0, 0.0)).is_none());
        grid.clear();
        assert!(search(&mut grid, CellIndex::new(0, 0), CellIndex::new(10, 0)).is_none());
    }

    #[test]
    fn test_repeatable_after_clear() {
        let mut grid = open_grid();
        grid.insert_rectangular_obstacle((-1.0, -3.0), (0.5, 3.0));
        let first = find_path(&mut grid, (-4.0, 0.0), (4.0, 1.0)).unwrap();

        grid.clear();
        grid.insert_rectangular_obstacle((-1.0, -3.0), (0.5, 3.0));
        let second = find_path(&mut grid, (-4.0, 0.0), (4.0, 1.0)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_search_marks_parents() {
        let mut grid = open_grid();
        let start = CellIndex::new(0, 0);

        search(&mut grid, start, CellIndex::new(3, 3)).unwrap();
        assert_eq!(grid.parent(start), Some(start));

        grid.clear();
        assert!(grid.cells().all(|cell| grid.parent(cell).is_none()));
    }

    #[test]
    fn test_narrow_corridor() {
        let mut grid = OccupancyGrid::new(20.0, 20.0, 1.0, (0.0, 0.0)).unwrap();
        for col in 0..20 {
            grid.set_occupied(CellIndex::new(col, 9), true);
            grid.set_occupied(CellIndex::new(col, 11), true);
        }

        let path = search(&mut grid, CellIndex::new(0, 10), CellIndex::new(19, 10)).unwrap();
        assert!(path.iter().all(|cell| cell.row == 10));
        assert_eq!(path.len(), 20);
    }

    #[test]
    fn test_equal_scores_pop_in_insertion_order() {
        let mut queue = BinaryHeap::new();
        queue.push(QueueEntry {
            score: 2.0,
            sequence: 0,
            cell: CellIndex::new(9, 9),
        });
        queue.push(QueueEntry {
            score: 1.0,
            sequence: 1,
            cell: CellIndex::new(5, 5),
        });
        queue.push(QueueEntry {
            score: 1.0,
            sequence: 2,
            cell: CellIndex::new(0, 0),
        });

        let order: Vec<CellIndex> = std::iter::from_fn(|| queue.pop().map(|e| e.cell)).collect();
        assert_eq!(
            order,
            vec![CellIndex::new(5, 5), CellIndex::new(0, 0), CellIndex::new(9, 9)]
        );
    }

    #[test]
    fn test_path_length_calculation() {
        let path = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0)];

        assert_relative_eq!(path_length(&path), 3.0);
        assert_eq!(path_length(&path[..1]), 0.0);
    }
}
