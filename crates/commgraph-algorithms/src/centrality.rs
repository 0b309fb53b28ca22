//! Degree and betweenness centrality
//!
//! Betweenness uses Brandes' accumulation over unweighted shortest paths. With
//! `samples` set, only that many sources (drawn without replacement) are
//! expanded and the result is extrapolated to the full node set.

use super::common::GraphView;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Degree of every node, by dense index
pub fn degree_centrality(view: &GraphView) -> Vec<usize> {
    (0..view.node_count).map(|i| view.degree(i)).collect()
}

/// Betweenness configuration
#[derive(Debug, Clone)]
pub struct BetweennessConfig {
    /// Number of sampled sources (None = every node)
    pub samples: Option<usize>,
    /// Seed for source sampling
    pub seed: u64,
    /// Scale by 1/((n-1)(n-2)) so scores fall in [0, 1]
    pub normalized: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            samples: None,
            seed: 0,
            normalized: true,
        }
    }
}

/// Betweenness centrality of an undirected view, by dense index
pub fn betweenness_centrality(view: &GraphView, config: &BetweennessConfig) -> Vec<f64> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }

    let sources: Vec<usize> = match config.samples {
        Some(k) if k < n => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            rand::seq::index::sample(&mut rng, n, k).into_vec()
        }
        _ => (0..n).collect(),
    };
    let k = sources.len();

    let mut scores = sources
        .par_iter()
        .fold(
            || (vec![0.0; n], BrandesScratch::new(n)),
            |(mut acc, mut scratch), &s| {
                scratch.accumulate(view, s, &mut acc);
                (acc, scratch)
            },
        )
        .map(|(acc, _)| acc)
        .reduce(
            || vec![0.0; n],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        );

    // Each undirected pair is seen from both endpoints.
    let mut scale = if config.normalized {
        if n > 2 {
            Some(1.0 / ((n - 1) * (n - 2)) as f64)
        } else {
            None
        }
    } else {
        Some(0.5)
    };
    if config.samples.is_some() && k > 0 {
        scale = scale.map(|s| s * n as f64 / k as f64);
    }

    match scale {
        Some(s) => scores.iter_mut().for_each(|x| *x *= s),
        None if config.normalized => scores.iter_mut().for_each(|x| *x = 0.0),
        None => {}
    }

    scores
}

/// Reusable per-thread buffers for one Brandes pass
struct BrandesScratch {
    sigma: Vec<f64>,
    dist: Vec<i64>,
    delta: Vec<f64>,
    preds: Vec<Vec<usize>>,
    stack: Vec<usize>,
    queue: VecDeque<usize>,
}

impl BrandesScratch {
    fn new(n: usize) -> Self {
        Self {
            sigma: vec![0.0; n],
            dist: vec![-1; n],
            delta: vec![0.0; n],
            preds: vec![Vec::new(); n],
            stack: Vec::with_capacity(n),
            queue: VecDeque::new(),
        }
    }

    fn accumulate(&mut self, view: &GraphView, source: usize, acc: &mut [f64]) {
        // Reset only what the previous pass touched
        for &v in &self.stack {
            self.sigma[v] = 0.0;
            self.dist[v] = -1;
            self.delta[v] = 0.0;
            self.preds[v].clear();
        }
        self.stack.clear();

        self.sigma[source] = 1.0;
        self.dist[source] = 0;
        self.queue.push_back(source);

        while let Some(v) = self.queue.pop_front() {
            self.stack.push(v);
            for &w in view.neighbors(v) {
                if self.dist[w] < 0 {
                    self.dist[w] = self.dist[v] + 1;
                    self.queue.push_back(w);
                }
                if self.dist[w] == self.dist[v] + 1 {
                    self.sigma[w] += self.sigma[v];
                    self.preds[w].push(v);
                }
            }
        }

        for &w in self.stack.iter().rev() {
            let coeff = (1.0 + self.delta[w]) / self.sigma[w];
            for &v in &self.preds[w] {
                self.delta[v] += self.sigma[v] * coeff;
            }
            if w != source {
                acc[w] += self.delta[w];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_graphs::{barbell, complete, undirected};

    #[test]
    fn test_degree() {
        let view = undirected(&[(1, 2), (1, 3), (1, 4)]);
        let degrees = degree_centrality(&view);
        assert_eq!(degrees[view.node_to_index[&1]], 3);
        assert_eq!(degrees[view.node_to_index[&4]], 1);
    }

    #[test]
    fn test_path_betweenness() {
        // 1-2-3: node 2 lies on the only path between 1 and 3
        let view = undirected(&[(1, 2), (2, 3)]);
        let scores = betweenness_centrality(&view, &BetweennessConfig::default());

        assert!((scores[view.node_to_index[&2]] - 1.0).abs() < 1e-12);
        assert_eq!(scores[view.node_to_index[&1]], 0.0);
        assert_eq!(scores[view.node_to_index[&3]], 0.0);
    }

    #[test]
    fn test_unnormalized_star() {
        // Star with 4 leaves: center is on C(4,2) = 6 shortest paths
        let view = undirected(&[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let config = BetweennessConfig { normalized: false, ..Default::default() };
        let scores = betweenness_centrality(&view, &config);
        assert!((scores[view.node_to_index[&0]] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_complete_graph_has_no_brokers() {
        let scores = betweenness_centrality(&complete(6), &BetweennessConfig::default());
        assert!(scores.iter().all(|&s| s.abs() < 1e-12));
    }

    #[test]
    fn test_bridge_endpoints_dominate() {
        let view = barbell();
        let scores = betweenness_centrality(&view, &BetweennessConfig::default());
        let bridge = scores[view.node_to_index[&4]];
        assert!((bridge - scores[view.node_to_index[&5]]).abs() < 1e-12);
        for id in [1u64, 2, 3, 6, 7, 8] {
            assert!(bridge > scores[view.node_to_index[&id]]);
        }
    }

    #[test]
    fn test_sampled_scores_are_extrapolated() {
        // Star with 4 leaves: a leaf source puts 3 pair-dependencies on the
        // center, the center as source puts none.
        let view = undirected(&[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let (n, k, seed) = (5usize, 2usize, 11u64);
        let center = view.node_to_index[&0];

        let mut rng = StdRng::seed_from_u64(seed);
        let sources = rand::seq::index::sample(&mut rng, n, k).into_vec();
        let leaf_sources = sources.iter().filter(|&&s| s != center).count() as f64;

        let raw = betweenness_centrality(
            &view,
            &BetweennessConfig { samples: Some(k), seed, normalized: false },
        );
        let expected = leaf_sources * 3.0 * 0.5 * n as f64 / k as f64;
        assert!((raw[center] - expected).abs() < 1e-12);

        let normalized = betweenness_centrality(
            &view,
            &BetweennessConfig { samples: Some(k), seed, normalized: true },
        );
        let expected = leaf_sources * 3.0 / 12.0 * n as f64 / k as f64;
        assert!((normalized[center] - expected).abs() < 1e-12);
        for leaf in [1u64, 2, 3, 4] {
            assert_eq!(normalized[view.node_to_index[&leaf]], 0.0);
        }
    }

    #[test]
    fn test_full_sample_matches_exact() {
        let view = barbell();
        let exact = betweenness_centrality(&view, &BetweennessConfig::default());
        let config = BetweennessConfig { samples: Some(view.node_count), seed: 3, normalized: true };
        let sampled = betweenness_centrality(&view, &config);
        for (x, y) in exact.iter().zip(&sampled) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let view = barbell();
        let config = BetweennessConfig { samples: Some(4), seed: 7, normalized: true };
        let a = betweenness_centrality(&view, &config);
        let b = betweenness_centrality(&view, &config);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-12);
        }
    }
}
