//! PageRank algorithm implementation
//!
//! Power iteration with uniform teleportation. Mass held by nodes without
//! outgoing edges is spread uniformly, so scores always sum to one.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// PageRank configuration
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Maximum number of iterations
    pub iterations: usize,
    /// Per-node tolerance; iteration stops once the L1 change drops below `n * tolerance`
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            iterations: 100,
            tolerance: 1.0e-6,
        }
    }
}

/// Scores by dense index plus convergence information
#[derive(Debug, Clone)]
pub struct PageRankOutcome {
    pub scores: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Calculate PageRank scores by dense index
pub fn page_rank_scores(view: &GraphView, config: &PageRankConfig) -> PageRankOutcome {
    let n = view.node_count;

    if n == 0 {
        return PageRankOutcome { scores: Vec::new(), iterations: 0, converged: true };
    }

    let uniform = 1.0 / n as f64;
    let mut scores = vec![uniform; n];
    let mut next_scores = vec![0.0; n];

    let d = config.damping_factor;
    let dangling: Vec<usize> = (0..n).filter(|&i| view.out_degree(i) == 0).collect();

    // Row-normalised weights, when present
    let out_strength: Option<Vec<f64>> = view.weights.as_ref().map(|_| {
        (0..n)
            .map(|i| view.weights(i).map(|w| w.iter().sum()).unwrap_or(0.0))
            .collect()
    });

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.iterations {
        iterations += 1;

        let dangling_mass: f64 = dangling.iter().map(|&i| scores[i]).sum();
        let base_score = (1.0 - d) * uniform + d * dangling_mass * uniform;
        next_scores.iter_mut().for_each(|s| *s = base_score);

        // Push each node's score along its outgoing edges
        for i in 0..n {
            let out_degree = view.out_degree(i);
            if out_degree == 0 {
                continue;
            }
            match (view.weights(i), out_strength.as_ref()) {
                (Some(w), Some(strength)) if strength[i] > 0.0 => {
                    for (&target, &weight) in view.successors(i).iter().zip(w) {
                        next_scores[target] += d * scores[i] * weight / strength[i];
                    }
                }
                _ => {
                    let share = d * scores[i] / out_degree as f64;
                    for &target in view.successors(i) {
                        next_scores[target] += share;
                    }
                }
            }
        }

        let total_diff: f64 = next_scores
            .iter()
            .zip(&scores)
            .map(|(next, prev)| (next - prev).abs())
            .sum();

        // Swap buffers
        std::mem::swap(&mut scores, &mut next_scores);

        // Check convergence
        if total_diff < n as f64 * config.tolerance {
            converged = true;
            break;
        }
    }

    PageRankOutcome { scores, iterations, converged }
}

/// Calculate PageRank for the graph view, keyed by NodeId
pub fn page_rank(view: &GraphView, config: &PageRankConfig) -> HashMap<NodeId, f64> {
    let outcome = page_rank_scores(view, config);

    let mut result = HashMap::with_capacity(view.node_count);
    for (idx, score) in outcome.scores.into_iter().enumerate() {
        result.insert(view.index_to_node[idx], score);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_graphs::{complete, undirected};

    #[test]
    fn test_star_center_ranks_highest() {
        // Center 1 with leaves 2..=5
        let view = undirected(&[(1, 2), (1, 3), (1, 4), (1, 5)]);
        let outcome = page_rank_scores(&view, &PageRankConfig::default());

        assert!(outcome.converged);
        let total: f64 = outcome.scores.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);

        let center = outcome.scores[view.node_to_index[&1]];
        for leaf in 2..=5u64 {
            assert!(center > outcome.scores[view.node_to_index[&leaf]]);
        }
    }

    #[test]
    fn test_regular_graph_is_uniform() {
        let view = complete(5);
        let scores = page_rank(&view, &PageRankConfig::default());
        for score in scores.values() {
            assert!((score - 0.2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dangling_mass_is_redistributed() {
        // 1->2 directed, 2 has no outgoing edges
        let mut node_to_index = HashMap::new();
        node_to_index.insert(1, 0);
        node_to_index.insert(2, 1);
        let view = GraphView::from_adjacency_list(
            2,
            vec![1, 2],
            node_to_index,
            vec![vec![1], vec![]],
            vec![vec![], vec![0]],
            None,
        );

        let outcome = page_rank_scores(&view, &PageRankConfig::default());
        let total: f64 = outcome.scores.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(outcome.scores[1] > outcome.scores[0]);
    }

    #[test]
    fn test_empty_graph() {
        let outcome = page_rank_scores(&GraphView::default(), &PageRankConfig::default());
        assert!(outcome.scores.is_empty());
    }
}
