//! Fundamental graph properties

use super::{derive_seed, SeedStream};
use crate::graph::ContactGraph;
use commgraph_algorithms::{connected_components, two_sweep_diameter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Size, density and connectivity summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasicMetrics {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub density: f64,
    pub is_directed: bool,
    pub connected_components: usize,
    pub lcc_nodes: usize,
    pub lcc_fraction: f64,
    /// Two-sweep lower bound on the diameter of the largest component
    pub diameter_lcc: Option<usize>,
    /// Filled by the small-world analysis when it runs
    pub avg_path_length: Option<f64>,
}

/// Density of a simple undirected graph
pub fn density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        0.0
    } else {
        2.0 * edges as f64 / (nodes as f64 * (nodes - 1) as f64)
    }
}

/// Compute fundamental graph properties
pub fn compute_basic_metrics(graph: &ContactGraph, seed: u64) -> BasicMetrics {
    let view = &graph.view;
    let n = view.node_count;
    let m = view.undirected_edge_count();

    let components = connected_components(view);
    let lcc_nodes = components.largest_size();
    let lcc_fraction = if n == 0 { 0.0 } else { lcc_nodes as f64 / n as f64 };

    let diameter_lcc = components.largest().map(|label| {
        let members: Vec<usize> = (0..n).filter(|&i| components.labels[i] == label).collect();
        let mut rng = StdRng::seed_from_u64(derive_seed(seed, SeedStream::Diameter));
        let start = members[rng.gen_range(0..members.len())];
        two_sweep_diameter(view, start)
    });

    let metrics = BasicMetrics {
        num_nodes: n,
        num_edges: m,
        density: density(n, m),
        is_directed: false,
        connected_components: components.count(),
        lcc_nodes,
        lcc_fraction,
        diameter_lcc,
        avg_path_length: None,
    };

    info!(
        components = metrics.connected_components,
        lcc_nodes = metrics.lcc_nodes,
        diameter = ?metrics.diameter_lcc,
        "Basic metrics computed"
    );

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_components() {
        // Path 1-2-3-4 plus a separate pair 10-11
        let graph = ContactGraph::from_edges(&[(1, 2), (2, 3), (3, 4), (10, 11)]);
        let metrics = compute_basic_metrics(&graph, 7);

        assert_eq!(metrics.num_nodes, 6);
        assert_eq!(metrics.num_edges, 4);
        assert!((metrics.density - 4.0 / 15.0).abs() < 1e-12);
        assert_eq!(metrics.connected_components, 2);
        assert_eq!(metrics.lcc_nodes, 4);
        assert!((metrics.lcc_fraction - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(metrics.diameter_lcc, Some(3));
        assert!(!metrics.is_directed);
    }

    #[test]
    fn test_empty_graph() {
        let graph = ContactGraph::from_edges(&[]);
        let metrics = compute_basic_metrics(&graph, 0);
        assert_eq!(metrics.num_nodes, 0);
        assert_eq!(metrics.density, 0.0);
        assert_eq!(metrics.lcc_fraction, 0.0);
        assert_eq!(metrics.diameter_lcc, None);
    }
}
