//! Spatial Clustering
//!
//! Groups sensor points into objects. Points are first hashed into square
//! buckets; buckets that touch along an edge (N/S/E/W, not diagonally) belong
//! to the same connected component.
//!
//! # Example
//!
//! ```rust
//! use fieldbot_library::algorithms::clustering::{bucket_points, cluster_points};
//!
//! let points = [(0.01, 0.01), (0.12, 0.03), (1.5, 1.5)];
//! let buckets = bucket_points(&points, 0.1);
//! let clusters = cluster_points(&buckets);
//!
//! assert_eq!(clusters.len(), 2);
//! ```

use super::geometry::Point2;
use std::collections::{HashMap, VecDeque};

/// Integer spatial-hash key of a bucket
pub type BucketId = (i64, i64);

/// Per-call bookkeeping for one bucket
struct Cell<'a> {
    visited: bool,
    cluster_id: Option<usize>,
    points: &'a [Point2],
}

/// Hash points into square buckets of `bucket_size` meters.
///
/// A point `(x, y)` lands in bucket `(floor(x / size), floor(y / size))`.
/// Non-finite points are dropped.
pub fn bucket_points(points: &[Point2], bucket_size: f64) -> HashMap<BucketId, Vec<Point2>> {
    let mut buckets: HashMap<BucketId, Vec<Point2>> = HashMap::new();
    if !(bucket_size.is_finite() && bucket_size > 0.0) {
        return buckets;
    }

    for &point in points {
        if !(point.0.is_finite() && point.1.is_finite()) {
            continue;
        }
        let id = (
            (point.0 / bucket_size).floor() as i64,
            (point.1 / bucket_size).floor() as i64,
        );
        buckets.entry(id).or_default().push(point);
    }
    buckets
}

/// Merge edge-adjacent buckets into clusters of points.
///
/// Buckets are visited in ascending id order, so clusters come out sorted by
/// their smallest bucket id. Within a cluster, points follow breadth-first
/// bucket order.
pub fn cluster_points(buckets: &HashMap<BucketId, Vec<Point2>>) -> Vec<Vec<Point2>> {
    let mut ids: Vec<BucketId> = buckets.keys().copied().collect();
    ids.sort_unstable();

    let mut cells: HashMap<BucketId, Cell<'_>> = buckets
        .iter()
        .map(|(&id, points)| {
            (
                id,
                Cell {
                    visited: false,
                    cluster_id: None,
                    points,
                },
            )
        })
        .collect();

    let mut clusters: Vec<Vec<Point2>> = Vec::new();
    let mut queue = VecDeque::new();

    for root in ids {
        if cells.get(&root).map_or(true, |cell| cell.cluster_id.is_some()) {
            continue;
        }

        let cluster_id = clusters.len();
        let mut members = Vec::new();
        queue.push_back(root);

        while let Some(id) = queue.pop_front() {
            let Some(cell) = cells.get_mut(&id) else {
                continue;
            };
            if cell.visited {
                continue;
            }
            cell.visited = true;
            cell.cluster_id = Some(cluster_id);
            members.extend_from_slice(cell.points);

            for neighbor in neighbor_ids(id).into_iter().flatten() {
                if cells.get(&neighbor).is_some_and(|cell| !cell.visited) {
                    queue.push_back(neighbor);
                }
            }
        }

        clusters.push(members);
    }

    clusters
}

/// West, east, south and north bucket ids
fn neighbor_ids((x, y): BucketId) -> [Option<BucketId>; 4] {
    [
        x.checked_sub(1).map(|x| (x, y)),
        x.checked_add(1).map(|x| (x, y)),
        y.checked_sub(1).map(|y| (x, y)),
        y.checked_add(1).map(|y| (x, y)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets(entries: &[(BucketId, Vec<Point2>)]) -> HashMap<BucketId, Vec<Point2>> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_adjacent_and_isolated_buckets() {
        let p1 = (0.05, 0.05);
        let p2 = (0.15, 0.05);
        let p3 = (0.55, 0.55);
        let input = buckets(&[((0, 0), vec![p1]), ((1, 0), vec![p2]), ((5, 5), vec![p3])]);

        let clusters = cluster_points(&input);

        assert_eq!(clusters, vec![vec![p1, p2], vec![p3]]);
    }

    #[test]
    fn test_diagonal_buckets_are_separate() {
        let input = buckets(&[((0, 0), vec![(0.0, 0.0)]), ((1, 1), vec![(1.0, 1.0)])]);

        assert_eq!(cluster_points(&input).len(), 2);
    }

    #[test]
    fn test_chain_forms_one_cluster() {
        // L-shaped chain plus a loop back, each bucket holding two points
        let ids = [(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0), (1, 0)];
        let entries: Vec<(BucketId, Vec<Point2>)> = ids
            .iter()
            .map(|&(x, y)| ((x, y), vec![(x as f64, y as f64), (x as f64 + 0.5, y as f64)]))
            .collect();

        let clusters = cluster_points(&buckets(&entries));

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 16);
    }

    #[test]
    fn test_clusters_ordered_by_smallest_bucket() {
        let input = buckets(&[
            ((10, 10), vec![(10.0, 10.0)]),
            ((-3, 4), vec![(-3.0, 4.0)]),
            ((-3, 5), vec![(-3.0, 5.0)]),
            ((0, 0), vec![(0.0, 0.0)]),
        ]);

        let clusters = cluster_points(&input);

        assert_eq!(
            clusters,
            vec![
                vec![(-3.0, 4.0), (-3.0, 5.0)],
                vec![(0.0, 0.0)],
                vec![(10.0, 10.0)],
            ]
        );
    }

    #[test]
    fn test_every_point_lands_in_exactly_one_cluster() {
        let points: Vec<Point2> = (0..50)
            .map(|i| ((i % 7) as f64 * 0.13, (i / 7) as f64 * 0.29))
            .collect();
        let input = bucket_points(&points, 0.1);

        let clusters = cluster_points(&input);
        let total: usize = clusters.iter().map(Vec::len).sum();

        assert_eq!(total, points.len());
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_points(&HashMap::new()).is_empty());
    }

    #[test]
    fn test_bucket_points() {
        let points = [(0.05, 0.05), (0.09, 0.01), (-0.05, 0.05), (0.25, -0.31)];

        let buckets = bucket_points(&points, 0.1);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[&(0, 0)], vec![(0.05, 0.05), (0.09, 0.01)]);
        assert_eq!(buckets[&(-1, 0)], vec![(-0.05, 0.05)]);
        assert_eq!(buckets[&(2, -4)], vec![(0.25, -0.31)]);
    }

    #[test]
    fn test_bucket_points_rejects_bad_input() {
        assert!(bucket_points(&[(0.0, 0.0)], 0.0).is_empty());
        assert!(bucket_points(&[(f64::NAN, 0.0)], 0.1).is_empty());
    }
}
