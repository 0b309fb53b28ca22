//! Graph topology analysis algorithms
//!
//! Triangle counting, local clustering and transitivity on undirected views.

use super::common::GraphView;
use rayon::prelude::*;

/// Triangles through each node, by dense index
pub fn node_triangles(view: &GraphView) -> Vec<usize> {
    let n = view.node_count;

    (0..n)
        .into_par_iter()
        .map_init(
            || vec![false; n],
            |marks, u| {
                let neighbors = view.neighbors(u);
                for &v in neighbors {
                    marks[v] = true;
                }

                let mut closed = 0;
                for &v in neighbors {
                    for &w in view.neighbors(v) {
                        if w != u && marks[w] {
                            closed += 1;
                        }
                    }
                }

                for &v in neighbors {
                    marks[v] = false;
                }

                // Each triangle u-v-w is reached via v and via w.
                closed / 2
            },
        )
        .collect()
}

/// Triangle Counting
///
/// Returns total number of triangles in the graph; each triangle is counted once.
pub fn count_triangles(view: &GraphView) -> usize {
    node_triangles(view).iter().sum::<usize>() / 3
}

/// Local clustering coefficient per node (0 for degree < 2)
pub fn local_clustering(view: &GraphView) -> Vec<f64> {
    node_triangles(view)
        .into_iter()
        .enumerate()
        .map(|(u, t)| {
            let k = view.degree(u);
            if k < 2 {
                0.0
            } else {
                2.0 * t as f64 / (k * (k - 1)) as f64
            }
        })
        .collect()
}

/// Mean of the local clustering coefficients over all nodes
pub fn average_clustering(view: &GraphView) -> f64 {
    if view.node_count == 0 {
        return 0.0;
    }
    local_clustering(view).iter().sum::<f64>() / view.node_count as f64
}

/// Global clustering: 3 × triangles / connected triples
pub fn transitivity(view: &GraphView) -> f64 {
    let triangles = count_triangles(view);
    let triples: usize = (0..view.node_count)
        .map(|u| {
            let k = view.degree(u);
            k * k.saturating_sub(1) / 2
        })
        .sum();

    if triples == 0 {
        0.0
    } else {
        3.0 * triangles as f64 / triples as f64
    }
}
