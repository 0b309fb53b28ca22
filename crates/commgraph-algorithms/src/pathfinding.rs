//! Unweighted shortest paths
//!
//! BFS distances, the two-sweep diameter lower bound, and mean path length
//! over a set of sources.

use super::common::GraphView;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Marker for nodes not reached by a BFS
pub const UNREACHABLE: usize = usize::MAX;

/// Hop distance from `source` to every node ([`UNREACHABLE`] when disconnected)
pub fn bfs_distances(view: &GraphView, source: usize) -> Vec<usize> {
    let mut dist = vec![UNREACHABLE; view.node_count];
    let mut queue = VecDeque::new();

    dist[source] = 0;
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        for &w in view.successors(v) {
            if dist[w] == UNREACHABLE {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
        }
    }

    dist
}

/// Farthest reachable node from `source` and its distance
pub fn eccentricity(view: &GraphView, source: usize) -> (usize, usize) {
    bfs_distances(view, source)
        .into_iter()
        .enumerate()
        .filter(|&(_, d)| d != UNREACHABLE)
        .fold((source, 0), |best, (idx, d)| if d > best.1 { (idx, d) } else { best })
}

/// Two-sweep lower bound on the diameter of the component containing `start`.
///
/// BFS from `start` to its farthest node, then report that node's eccentricity.
/// Exact on trees and tight on most real-world graphs.
pub fn two_sweep_diameter(view: &GraphView, start: usize) -> usize {
    let (far, _) = eccentricity(view, start);
    eccentricity(view, far).1
}

/// Sum and count of finite, non-zero hop distances from each source
pub fn path_length_totals(view: &GraphView, sources: &[usize]) -> (u64, u64) {
    sources
        .par_iter()
        .map(|&s| {
            bfs_distances(view, s)
                .into_iter()
                .filter(|&d| d != UNREACHABLE && d > 0)
                .fold((0u64, 0u64), |(sum, count), d| (sum + d as u64, count + 1))
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
}

/// Mean shortest-path length between each source and every node it reaches
pub fn mean_path_length(view: &GraphView, sources: &[usize]) -> Option<f64> {
    let (sum, count) = path_length_totals(view, sources);
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_graphs::{barbell, undirected};

    #[test]
    fn test_distances_and_diameter() {
        // Path 1-2-3-4-5
        let view = undirected(&[(1, 2), (2, 3), (3, 4), (4, 5)]);
        let middle = view.node_to_index[&3];

        let dist = bfs_distances(&view, middle);
        assert_eq!(dist[view.node_to_index[&1]], 2);
        assert_eq!(two_sweep_diameter(&view, middle), 4);
    }

    #[test]
    fn test_barbell_diameter() {
        let view = barbell();
        assert_eq!(two_sweep_diameter(&view, view.node_to_index[&4]), 3);
    }

    #[test]
    fn test_mean_path_length() {
        // Triangle 1-2-3 plus pendant 4 on node 3
        let view = undirected(&[(1, 2), (2, 3), (1, 3), (3, 4)]);
        let all: Vec<usize> = (0..view.node_count).collect();
        // Pair distances: 1-2:1, 1-3:1, 2-3:1, 3-4:1, 1-4:2, 2-4:2 -> 8 / 6
        let mean = mean_path_length(&view, &all).unwrap();
        assert!((mean - 8.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_unreachable_is_skipped() {
        let view = undirected(&[(1, 2), (3, 4)]);
        let dist = bfs_distances(&view, 0);
        assert_eq!(dist[view.node_to_index[&3]], UNREACHABLE);
        assert_eq!(mean_path_length(&view, &[0]), Some(1.0));
    }
}
