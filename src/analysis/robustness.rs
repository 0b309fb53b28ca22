//! Robustness: targeted attack vs random failure
//!
//! Nodes are removed by masking; the largest surviving component is measured
//! with a fresh union-find pass for every removal level.

use super::centrality::CentralityTable;
use super::{derive_seed, SeedStream};
use crate::config::RobustnessConfig;
use commgraph_algorithms::{connected_components_masked, GraphView};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Connectivity after removing a percentage of nodes by PageRank
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetedAttack {
    pub nodes_removed: usize,
    pub largest_component_size: usize,
    /// Relative to the original node count
    pub largest_component_pct: f64,
    pub num_components: usize,
}

/// Mean connectivity over random removal trials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomFailure {
    pub nodes_removed: usize,
    pub largest_component_size: f64,
    pub largest_component_pct: f64,
    /// Population standard deviation of `largest_component_pct`
    pub std: f64,
}

/// Both simulations plus the 50% critical points
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RobustnessReport {
    pub targeted_attack: BTreeMap<u32, TargetedAttack>,
    pub random_failure: BTreeMap<u32, RandomFailure>,
    pub critical_point_targeted: Option<u32>,
    pub critical_point_random: Option<u32>,
}

impl RobustnessReport {
    pub fn new(
        targeted_attack: BTreeMap<u32, TargetedAttack>,
        random_failure: BTreeMap<u32, RandomFailure>,
    ) -> Self {
        let critical_point_targeted = targeted_attack
            .iter()
            .find(|(_, r)| r.largest_component_pct < 50.0)
            .map(|(&pct, _)| pct);
        let critical_point_random = random_failure
            .iter()
            .find(|(_, r)| r.largest_component_pct < 50.0)
            .map(|(&pct, _)| pct);

        Self {
            targeted_attack,
            random_failure,
            critical_point_targeted,
            critical_point_random,
        }
    }
}

/// Nodes removed at a given percentage
pub fn removal_count(nodes: usize, pct: u32) -> usize {
    (nodes * pct as usize / 100).min(nodes)
}

/// Largest component size and component count with `removed` nodes taken out
fn measure(view: &GraphView, removed: &[usize]) -> (usize, usize) {
    let mut active = vec![true; view.node_count];
    for &idx in removed {
        active[idx] = false;
    }
    let components = connected_components_masked(view, &active);
    (components.largest_size(), components.count())
}

fn percentage(part: f64, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part / whole as f64 * 100.0
    }
}

/// Remove the highest-PageRank nodes first
pub fn simulate_targeted_attack(
    view: &GraphView,
    centrality: &CentralityTable,
    config: &RobustnessConfig,
) -> BTreeMap<u32, TargetedAttack> {
    let n = view.node_count;
    let order = centrality.ranked_by(|r| r.pagerank);
    info!(levels = config.percentages.len(), "Simulating targeted attack");

    config
        .percentages
        .par_iter()
        .map(|&pct| {
            let k = removal_count(n, pct);
            let (largest, count) = measure(view, &order[..k]);
            (
                pct,
                TargetedAttack {
                    nodes_removed: k,
                    largest_component_size: largest,
                    largest_component_pct: percentage(largest as f64, n),
                    num_components: count,
                },
            )
        })
        .collect()
}

/// Remove uniformly random nodes, averaging over `random_trials` trials
pub fn simulate_random_failure(
    view: &GraphView,
    config: &RobustnessConfig,
    seed: u64,
) -> BTreeMap<u32, RandomFailure> {
    let n = view.node_count;
    let base = derive_seed(seed, SeedStream::RandomFailure);
    info!(
        levels = config.percentages.len(),
        trials = config.random_trials,
        "Simulating random failure"
    );

    config
        .percentages
        .iter()
        .map(|&pct| {
            let k = removal_count(n, pct);
            let sizes: Vec<usize> = (0..config.random_trials)
                .into_par_iter()
                .map(|trial| {
                    let trial_seed = base
                        .wrapping_add(pct as u64 * 1_000_003)
                        .wrapping_add(trial as u64);
                    let mut rng = StdRng::seed_from_u64(trial_seed);
                    let removed = rand::seq::index::sample(&mut rng, n, k).into_vec();
                    measure(view, &removed).0
                })
                .collect();

            let trials = sizes.len() as f64;
            let pcts: Vec<f64> = sizes.iter().map(|&s| percentage(s as f64, n)).collect();
            let mean_size = sizes.iter().sum::<usize>() as f64 / trials;
            let mean_pct = pcts.iter().sum::<f64>() / trials;
            let variance = pcts.iter().map(|p| (p - mean_pct).powi(2)).sum::<f64>() / trials;

            (
                pct,
                RandomFailure {
                    nodes_removed: k,
                    largest_component_size: mean_size,
                    largest_component_pct: mean_pct,
                    std: variance.sqrt(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::centrality::compute_centralities;
    use crate::config::CentralityConfig;
    use crate::graph::ContactGraph;

    /// Hub 0 with 19 leaves, plus a 5-node path hanging off leaf 1
    fn hub_and_spokes() -> ContactGraph {
        let mut edges: Vec<(u64, u64)> = (1..20).map(|i| (0, i)).collect();
        edges.extend([(1, 100), (100, 101), (101, 102), (102, 103), (103, 104)]);
        ContactGraph::from_edges(&edges)
    }

    #[test]
    fn test_removal_count_floors() {
        assert_eq!(removal_count(36_692, 1), 366);
        assert_eq!(removal_count(10, 5), 0);
        assert_eq!(removal_count(10, 99), 9);
    }

    #[test]
    fn test_targeted_attack_shatters_star() {
        let graph = hub_and_spokes();
        let table = compute_centralities(&graph.view, &CentralityConfig::default(), 0);
        let config = RobustnessConfig { percentages: vec![4, 20], random_trials: 3 };

        let targeted = simulate_targeted_attack(&graph.view, &table, &config);
        let n = graph.node_count();
        assert_eq!(n, 25);

        // 4% of 25 = 1 node: the hub goes, leaving the path 1-100..104 as largest
        let first = &targeted[&4];
        assert_eq!(first.nodes_removed, 1);
        assert_eq!(first.largest_component_size, 6);
        assert_eq!(first.num_components, 19);
        assert!((first.largest_component_pct - 24.0).abs() < 1e-9);

        let report = RobustnessReport::new(targeted, BTreeMap::new());
        assert_eq!(report.critical_point_targeted, Some(4));
        assert_eq!(report.critical_point_random, None);
    }

    #[test]
    fn test_random_failure_is_reproducible() {
        let graph = hub_and_spokes();
        let config = RobustnessConfig { percentages: vec![20], random_trials: 4 };

        let a = simulate_random_failure(&graph.view, &config, 9);
        let b = simulate_random_failure(&graph.view, &config, 9);
        assert_eq!(a, b);

        let r = &a[&20];
        assert_eq!(r.nodes_removed, 5);
        assert!(r.largest_component_size <= 20.0);
        assert!(r.std >= 0.0);
    }

    #[test]
    fn test_no_removal_keeps_everything() {
        let graph = ContactGraph::from_edges(&[(1, 2), (2, 3)]);
        let config = RobustnessConfig { percentages: vec![10], random_trials: 2 };
        let random = simulate_random_failure(&graph.view, &config, 1);
        assert_eq!(random[&10].nodes_removed, 0);
        assert!((random[&10].largest_component_pct - 100.0).abs() < 1e-9);
    }
}
