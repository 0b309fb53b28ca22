//! Centrality measures: degree, PageRank, sampled betweenness

use super::{derive_seed, SeedStream};
use crate::config::CentralityConfig;
use commgraph_algorithms::{
    betweenness_centrality, degree_centrality, page_rank_scores, BetweennessConfig, GraphView,
    NodeId, PageRankConfig,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// Centrality scores of one node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CentralityRow {
    pub node: NodeId,
    pub degree: usize,
    pub pagerank: f64,
    pub betweenness: f64,
    pub degree_norm: f64,
    pub pagerank_norm: f64,
    pub betweenness_norm: f64,
}

/// One row per node, in the graph's index order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CentralityTable {
    pub rows: Vec<CentralityRow>,
}

impl CentralityTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row indices ordered by a score, highest first; ties keep index order
    pub fn ranked_by<F>(&self, score: F) -> Vec<usize>
    where
        F: Fn(&CentralityRow) -> f64,
    {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| score(&self.rows[b]).total_cmp(&score(&self.rows[a])));
        order
    }

    /// The `k` highest-PageRank rows
    pub fn top_pagerank(&self, k: usize) -> Vec<&CentralityRow> {
        self.ranked_by(|r| r.pagerank)
            .into_iter()
            .take(k)
            .map(|i| &self.rows[i])
            .collect()
    }
}

/// Divide each value by the maximum (all zeros when the maximum is not positive)
pub fn normalize_by_max(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        values.iter().map(|v| v / max).collect()
    } else {
        vec![0.0; values.len()]
    }
}

/// Compute degree, PageRank and betweenness for every node
pub fn compute_centralities(view: &GraphView, config: &CentralityConfig, seed: u64) -> CentralityTable {
    let n = view.node_count;

    info!("Computing degree centrality");
    let degree = degree_centrality(view);

    info!(alpha = config.pagerank_alpha, "Computing PageRank");
    let pagerank = page_rank_scores(
        view,
        &PageRankConfig {
            damping_factor: config.pagerank_alpha,
            iterations: config.pagerank_max_iterations,
            tolerance: config.pagerank_tolerance,
        },
    );
    if !pagerank.converged {
        warn!(iterations = pagerank.iterations, "PageRank did not converge");
    }

    let samples = config.betweenness_k_samples.min(n);
    info!(samples, "Computing betweenness centrality (sampled)");
    let started = Instant::now();
    let betweenness = betweenness_centrality(
        view,
        &BetweennessConfig {
            samples: Some(samples),
            seed: derive_seed(seed, SeedStream::Betweenness),
            normalized: true,
        },
    );
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "Betweenness done");

    let degree_f: Vec<f64> = degree.iter().map(|&d| d as f64).collect();
    let degree_norm = normalize_by_max(&degree_f);
    let pagerank_norm = normalize_by_max(&pagerank.scores);
    let betweenness_norm = normalize_by_max(&betweenness);

    let rows = (0..n)
        .map(|i| CentralityRow {
            node: view.index_to_node[i],
            degree: degree[i],
            pagerank: pagerank.scores[i],
            betweenness: betweenness[i],
            degree_norm: degree_norm[i],
            pagerank_norm: pagerank_norm[i],
            betweenness_norm: betweenness_norm[i],
        })
        .collect();

    CentralityTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ContactGraph;

    fn star() -> ContactGraph {
        ContactGraph::from_edges(&[(0, 1), (0, 2), (0, 3), (0, 4), (3, 4)])
    }

    #[test]
    fn test_hub_is_normalised_to_one() {
        let graph = star();
        let table = compute_centralities(&graph.view, &CentralityConfig::default(), 1);

        assert_eq!(table.len(), 5);
        let hub = &table.rows[graph.view.node_to_index[&0]];
        assert_eq!(hub.degree, 4);
        assert_eq!(hub.degree_norm, 1.0);
        assert_eq!(hub.pagerank_norm, 1.0);
        assert_eq!(hub.betweenness_norm, 1.0);

        let total: f64 = table.rows.iter().map(|r| r.pagerank).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_pagerank_order() {
        let graph = star();
        let table = compute_centralities(&graph.view, &CentralityConfig::default(), 1);
        let top = table.top_pagerank(2);
        assert_eq!(top[0].node, 0);
        assert!(top[0].pagerank >= top[1].pagerank);
    }

    #[test]
    fn test_normalize_all_zero() {
        assert_eq!(normalize_by_max(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(normalize_by_max(&[1.0, 4.0]), vec![0.25, 1.0]);
    }
}
