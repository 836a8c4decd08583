//! Matching utilities for centroid tracking.

use crate::tracker::rect::Centroid;
use ndarray::{Array2, Axis};

/// Compute the Euclidean distance matrix between tracked and input centroids.
///
/// Rows follow `tracked`, columns follow `inputs`.
pub fn euclidean_distance(tracked: &[Centroid], inputs: &[Centroid]) -> Array2<f64> {
    let mut dists = Array2::zeros((tracked.len(), inputs.len()));
    for (i, t) in tracked.iter().enumerate() {
        for (j, c) in inputs.iter().enumerate() {
            dists[[i, j]] = t.distance(c);
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy nearest-neighbour assignment.
///
/// Rows are visited in ascending order of their smallest distance. Each row
/// takes its nearest column; when several columns tie at that distance the
/// first one still free is used. If every nearest column has already been
/// consumed the row stays unmatched, even when a farther free column exists.
/// This is not a minimum total cost matching.
pub fn greedy_assignment(cost_matrix: &Array2<f64>) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 {
        return AssignmentResult {
            matches: vec![],
            unmatched_tracks: vec![],
            unmatched_detections: (0..num_cols).collect(),
        };
    }

    if num_cols == 0 {
        return AssignmentResult {
            matches: vec![],
            unmatched_tracks: (0..num_rows).collect(),
            unmatched_detections: vec![],
        };
    }

    // (row, distance to its nearest column)
    let mut proposals: Vec<(usize, f64)> = cost_matrix
        .axis_iter(Axis(0))
        .enumerate()
        .map(|(row, dists)| (row, dists.iter().copied().fold(f64::INFINITY, f64::min)))
        .collect();

    // Stable, so equal minima keep row order.
    proposals.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut used_rows = vec![false; num_rows];
    let mut used_cols = vec![false; num_cols];
    let mut matches = Vec::new();

    for (row, min_dist) in proposals {
        let nearest_free = (0..num_cols)
            .find(|&col| !used_cols[col] && cost_matrix[[row, col]] == min_dist);
        let Some(col) = nearest_free else {
            continue;
        };
        used_rows[row] = true;
        used_cols[col] = true;
        matches.push((row, col));
    }

    let unmatched_tracks = (0..num_rows).filter(|&r| !used_rows[r]).collect();
    let unmatched_detections = (0..num_cols).filter(|&c| !used_cols[c]).collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn c(x: i32, y: i32) -> Centroid {
        Centroid::new(x, y)
    }

    #[test]
    fn test_distance_matrix_shape_and_values() {
        let dists = euclidean_distance(&[c(0, 0), c(100, 100)], &[c(2, 1), c(98, 101)]);
        assert_eq!(dists.dim(), (2, 2));
        assert_relative_eq!(dists[[0, 0]], 5f64.sqrt());
        assert_relative_eq!(dists[[1, 1]], 5f64.sqrt());
        assert_relative_eq!(dists[[0, 1]], (98f64 * 98.0 + 101.0 * 101.0).sqrt());
    }

    #[test]
    fn test_greedy_matches_nearest() {
        let dists = euclidean_distance(&[c(0, 0), c(100, 100)], &[c(98, 101), c(2, 1)]);
        let result = greedy_assignment(&dists);
        assert_eq!(result.matches, vec![(0, 1), (1, 0)]);
        assert!(result.unmatched_tracks.is_empty());
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_greedy_contested_column_leaves_row_unmatched() {
        // Both rows prefer column 0; row 1 is closer so it wins, and row 0
        // does not fall back to column 1.
        let cost = array![[3.0, 4.0], [1.0, 50.0]];
        let result = greedy_assignment(&cost);
        assert_eq!(result.matches, vec![(1, 0)]);
        assert_eq!(result.unmatched_tracks, vec![0]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }

    #[test]
    fn test_greedy_tie_prefers_lowest_column() {
        let cost = array![[2.0, 2.0]];
        let result = greedy_assignment(&cost);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }

    #[test]
    fn test_greedy_tie_takes_next_free_column() {
        // Duplicate boxes: both rows are equally close to both columns.
        let cost = array![[0.0, 0.0], [0.0, 0.0]];
        let result = greedy_assignment(&cost);
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
        assert!(result.unmatched_tracks.is_empty());
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_greedy_empty_sides() {
        let no_rows = Array2::<f64>::zeros((0, 3));
        assert_eq!(greedy_assignment(&no_rows).unmatched_detections, vec![0, 1, 2]);

        let no_cols = Array2::<f64>::zeros((2, 0));
        assert_eq!(greedy_assignment(&no_cols).unmatched_tracks, vec![0, 1]);
    }

    #[test]
    fn test_greedy_more_inputs_than_tracks() {
        let dists = euclidean_distance(&[c(50, 50)], &[c(0, 0), c(52, 49), c(200, 200)]);
        let result = greedy_assignment(&dists);
        assert_eq!(result.matches, vec![(0, 1)]);
        assert_eq!(result.unmatched_detections, vec![0, 2]);
    }
}
