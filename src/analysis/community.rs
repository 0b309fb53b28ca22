//! Community detection with probabilistic sampling
//!
//! Louvain runs on a degree-biased sample of the largest connected component,
//! then the partition is propagated back to every node of the component:
//!
//! 1. Keep each node with probability `rate · f / (1 + f)`, `f = degree / mean degree`.
//! 2. Run Louvain on the subgraph induced by the kept nodes.
//! 3. An unsampled node joins the community of its sampled neighbour that has the
//!    most sampled neighbours itself. Nodes with no sampled neighbour are labelled in
//!    later waves from already-labelled neighbours.
//! 4. Score the propagated partition by modularity on the full component.

use super::{derive_seed, SeedStream};
use crate::config::CommunityConfig;
use commgraph_algorithms::{louvain, modularity, GraphView, LouvainConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Summary written to `communities.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommunityReport {
    pub num_communities: usize,
    pub modularity: f64,
    /// Community sizes, largest first
    pub community_sizes: Vec<usize>,
    pub largest_community_size: usize,
    pub smallest_community_size: usize,
    pub sampling_method: String,
    pub sampling_rate: f64,
    pub sampled_nodes: usize,
    pub lcc_nodes: usize,
}

/// Full outcome: the component analysed, its partition and the report
#[derive(Debug, Clone)]
pub struct CommunityDetection {
    /// Largest connected component the partition refers to
    pub component: GraphView,
    /// Community per dense index of `component`
    pub partition: Vec<usize>,
    pub report: CommunityReport,
}

/// Degree-biased node sample. Returns the keep mask.
pub fn probabilistic_sample(view: &GraphView, sampling_rate: f64, rng: &mut impl Rng) -> Vec<bool> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }

    let mean_degree = (0..n).map(|i| view.degree(i)).sum::<usize>() as f64 / n as f64;
    if mean_degree <= 0.0 {
        return vec![false; n];
    }

    (0..n)
        .map(|i| {
            let degree_factor = view.degree(i) as f64 / mean_degree;
            let prob = sampling_rate * degree_factor / (1.0 + degree_factor);
            rng.gen::<f64>() <= prob
        })
        .collect()
}

/// Extend a partition of the sampled nodes to the whole graph.
///
/// `sampled` maps each node of `full` to its community in the sample, or `None`
/// when the node was not sampled. Returned ids stay contiguous.
pub fn propagate_partition(full: &GraphView, sampled: &[Option<usize>]) -> Vec<usize> {
    let n = full.node_count;
    let mut labels: Vec<Option<usize>> = sampled.to_vec();

    // Sampled neighbours of each node, used to pick the best anchor
    let sampled_degree: Vec<usize> = (0..n)
        .map(|i| full.neighbors(i).iter().filter(|&&v| sampled[v].is_some()).count())
        .collect();

    // First wave: anchor on sampled neighbours only
    for u in 0..n {
        if labels[u].is_some() {
            continue;
        }
        let mut best: Option<usize> = None;
        for &v in full.neighbors(u) {
            if sampled[v].is_none() {
                continue;
            }
            match best {
                Some(b) if sampled_degree[b] >= sampled_degree[v] => {}
                _ => best = Some(v),
            }
        }
        if let Some(b) = best {
            labels[u] = sampled[b];
        }
    }

    // Later waves: anchor on any labelled neighbour until nothing changes
    loop {
        let mut updates = Vec::new();
        for u in 0..n {
            if labels[u].is_some() {
                continue;
            }
            let mut best: Option<usize> = None;
            for &v in full.neighbors(u) {
                if labels[v].is_none() {
                    continue;
                }
                match best {
                    Some(b) if full.degree(b) >= full.degree(v) => {}
                    _ => best = Some(v),
                }
            }
            if let Some(b) = best {
                updates.push((u, labels[b]));
            }
        }
        if updates.is_empty() {
            break;
        }
        for (u, label) in updates {
            labels[u] = label;
        }
    }

    // Anything left is cut off from every sampled node
    let mut next = sampled.iter().flatten().max().map(|&m| m + 1).unwrap_or(0);
    let filled = labels
        .into_iter()
        .map(|label| {
            label.unwrap_or_else(|| {
                next += 1;
                next - 1
            })
        })
        .collect();
    compact(filled)
}

/// Renumber community ids to 0..k in order of first appearance
fn compact(partition: Vec<usize>) -> Vec<usize> {
    let mut mapping = std::collections::HashMap::new();
    partition
        .into_iter()
        .map(|c| {
            let next = mapping.len();
            *mapping.entry(c).or_insert(next)
        })
        .collect()
}

/// Community sizes, largest first
pub fn community_sizes(partition: &[usize]) -> Vec<usize> {
    let k = partition.iter().max().map(|&m| m + 1).unwrap_or(0);
    let mut sizes = vec![0; k];
    for &c in partition {
        sizes[c] += 1;
    }
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

/// Detect communities on the largest connected component with probabilistic sampling
pub fn detect_communities(graph: &GraphView, config: &CommunityConfig, seed: u64) -> CommunityDetection {
    let started = Instant::now();
    let component = commgraph_algorithms::largest_component(graph);
    let lcc_nodes = component.node_count;
    info!(lcc_nodes, "Detecting communities on largest component");

    let mut rng = StdRng::seed_from_u64(derive_seed(seed, SeedStream::Sampling));
    let keep = probabilistic_sample(&component, config.sampling_rate, &mut rng);
    let sampled_nodes = keep.iter().filter(|&&k| k).count();

    let louvain_config = LouvainConfig {
        resolution: config.resolution,
        seed: derive_seed(seed, SeedStream::Louvain),
        ..Default::default()
    };

    let partition = if sampled_nodes == 0 {
        warn!("Sample is empty, running Louvain on the full component");
        louvain(&component, &louvain_config).partition
    } else {
        let sample = component.induced_subgraph(&keep);
        info!(
            sampled_nodes,
            sampled_edges = sample.undirected_edge_count(),
            fraction = sampled_nodes as f64 / lcc_nodes as f64,
            "Probabilistic sample drawn"
        );

        let result = louvain(&sample, &louvain_config);
        debug!(
            levels = result.levels,
            sample_modularity = result.modularity,
            communities = result.community_count(),
            "Louvain finished on sample"
        );

        // Sampled nodes keep their relative order in the induced subgraph.
        let mut sampled_labels = vec![None; lcc_nodes];
        let mut cursor = 0;
        for (idx, &kept) in keep.iter().enumerate() {
            if kept {
                sampled_labels[idx] = Some(result.partition[cursor]);
                cursor += 1;
            }
        }
        propagate_partition(&component, &sampled_labels)
    };

    let q = modularity(&component, &partition, config.resolution);
    let sizes = community_sizes(&partition);

    let report = CommunityReport {
        num_communities: sizes.len(),
        modularity: q,
        largest_community_size: sizes.first().copied().unwrap_or(0),
        smallest_community_size: sizes.last().copied().unwrap_or(0),
        community_sizes: sizes,
        sampling_method: format!("probabilistic ({:.0}%)", config.sampling_rate * 100.0),
        sampling_rate: config.sampling_rate,
        sampled_nodes,
        lcc_nodes,
    };

    info!(
        communities = report.num_communities,
        modularity = report.modularity,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Community detection complete"
    );

    CommunityDetection {
        component,
        partition,
        report,
    }
}
