//! Community detection
//!
//! Louvain modularity optimisation (Blondel et al. 2008). Each level greedily
//! moves single nodes to the neighbouring community with the largest strictly
//! positive modularity gain, then collapses communities into super-nodes. Levels
//! repeat until a level improves modularity by less than `min_gain`.
//!
//! Modularity with resolution γ:
//!
//! ```text
//! Q = Σ_c [ L_c / m  -  γ (D_c / 2m)² ]
//! ```
//!
//! where `L_c` is the edge weight inside community `c`, `D_c` the summed degree
//! of its members and `m` the total edge weight.

use super::common::GraphView;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Louvain configuration
#[derive(Debug, Clone)]
pub struct LouvainConfig {
    /// Resolution γ (1.0 = standard modularity)
    pub resolution: f64,
    /// Seed for the node visiting order
    pub seed: u64,
    /// Smallest modularity improvement that keeps the optimisation going
    pub min_gain: f64,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: 0,
            min_gain: 1.0e-7,
        }
    }
}

/// Result of Louvain community detection
#[derive(Debug, Clone)]
pub struct LouvainResult {
    /// Community per dense node index, numbered contiguously from 0
    pub partition: Vec<usize>,
    /// Modularity of `partition`
    pub modularity: f64,
    /// Number of aggregation levels kept
    pub levels: usize,
}

impl LouvainResult {
    /// Number of distinct communities
    pub fn community_count(&self) -> usize {
        self.partition.iter().max().map(|&m| m + 1).unwrap_or(0)
    }
}

/// Weighted undirected graph used during aggregation.
///
/// Self-loops live outside `adjacency`; a loop of weight w adds 2w to the degree.
#[derive(Debug, Clone)]
struct WeightedGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    degrees: Vec<f64>,
    total_weight: f64,
}

impl WeightedGraph {
    fn from_view(view: &GraphView) -> Self {
        let n = view.node_count;
        let mut adjacency = Vec::with_capacity(n);
        let mut self_loops = vec![0.0; n];

        for u in 0..n {
            let weights = view.weights(u);
            let mut row = Vec::with_capacity(view.degree(u));
            for (pos, &v) in view.neighbors(u).iter().enumerate() {
                let w = weights.map(|ws| ws[pos]).unwrap_or(1.0);
                if u == v {
                    self_loops[u] += w;
                } else {
                    row.push((v, w));
                }
            }
            adjacency.push(row);
        }

        Self::from_parts(adjacency, self_loops)
    }

    fn from_parts(adjacency: Vec<Vec<(usize, f64)>>, self_loops: Vec<f64>) -> Self {
        let degrees: Vec<f64> = adjacency
            .iter()
            .zip(&self_loops)
            .map(|(row, &l)| row.iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * l)
            .collect();
        let total_weight = degrees.iter().sum::<f64>() / 2.0;

        Self { adjacency, self_loops, degrees, total_weight }
    }

    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Collapse each community into a single node
    fn aggregate(&self, partition: &[usize], communities: usize) -> WeightedGraph {
        let mut self_loops = vec![0.0; communities];
        let mut rows: Vec<std::collections::HashMap<usize, f64>> =
            vec![std::collections::HashMap::new(); communities];

        for u in 0..self.node_count() {
            let cu = partition[u];
            self_loops[cu] += self.self_loops[u];
            for &(v, w) in &self.adjacency[u] {
                let cv = partition[v];
                if cu == cv {
                    // Internal edges are visited from both endpoints.
                    self_loops[cu] += w / 2.0;
                } else {
                    *rows[cu].entry(cv).or_insert(0.0) += w;
                }
            }
        }

        let adjacency = rows
            .into_iter()
            .map(|row| {
                let mut row: Vec<(usize, f64)> = row.into_iter().collect();
                row.sort_unstable_by_key(|&(c, _)| c);
                row
            })
            .collect();

        Self::from_parts(adjacency, self_loops)
    }
}

/// Mutable per-level state of the local moving phase
struct LevelState {
    node_community: Vec<usize>,
    /// Summed degree of each community
    community_degree: Vec<f64>,
    /// Internal edge weight of each community
    community_internal: Vec<f64>,
}

impl LevelState {
    fn singletons(graph: &WeightedGraph) -> Self {
        Self {
            node_community: (0..graph.node_count()).collect(),
            community_degree: graph.degrees.clone(),
            community_internal: graph.self_loops.clone(),
        }
    }

    fn remove(&mut self, graph: &WeightedGraph, node: usize, community: usize, links: f64) {
        self.community_degree[community] -= graph.degrees[node];
        self.community_internal[community] -= links + graph.self_loops[node];
    }

    fn insert(&mut self, graph: &WeightedGraph, node: usize, community: usize, links: f64) {
        self.node_community[node] = community;
        self.community_degree[community] += graph.degrees[node];
        self.community_internal[community] += links + graph.self_loops[node];
    }

    fn modularity(&self, graph: &WeightedGraph, resolution: f64) -> f64 {
        let m = graph.total_weight;
        if m <= 0.0 {
            return 0.0;
        }
        self.community_internal
            .iter()
            .zip(&self.community_degree)
            .map(|(&internal, &degree)| internal / m - resolution * (degree / (2.0 * m)).powi(2))
            .sum()
    }
}

/// One round of local moves. Returns the state after the last improving pass.
fn one_level(graph: &WeightedGraph, config: &LouvainConfig, rng: &mut StdRng) -> LevelState {
    let n = graph.node_count();
    let mut state = LevelState::singletons(graph);
    let two_m = 2.0 * graph.total_weight;

    // Scratch for neighbour-community weights
    let mut neigh_weight = vec![0.0; n];
    let mut neigh_seen = vec![false; n];
    let mut neigh_touched: Vec<usize> = Vec::new();

    let mut order: Vec<usize> = (0..n).collect();
    let mut current = state.modularity(graph, config.resolution);

    loop {
        let mut moved = false;
        order.shuffle(rng);

        for &node in &order {
            let own = state.node_community[node];

            for &c in &neigh_touched {
                neigh_weight[c] = 0.0;
                neigh_seen[c] = false;
            }
            neigh_touched.clear();
            for &(v, w) in &graph.adjacency[node] {
                let c = state.node_community[v];
                if !neigh_seen[c] {
                    neigh_seen[c] = true;
                    neigh_touched.push(c);
                }
                neigh_weight[c] += w;
            }

            state.remove(graph, node, own, neigh_weight[own]);

            let degree_share = config.resolution * graph.degrees[node] / two_m;
            let gain = |c: usize, state: &LevelState| {
                neigh_weight[c] - state.community_degree[c] * degree_share
            };

            let mut best = own;
            let mut best_gain = gain(own, &state);

            neigh_touched.shuffle(rng);
            for &c in &neigh_touched {
                let g = gain(c, &state);
                if g > best_gain {
                    best_gain = g;
                    best = c;
                }
            }

            state.insert(graph, node, best, neigh_weight[best]);
            if best != own {
                moved = true;
            }
        }

        let next = state.modularity(graph, config.resolution);
        if !moved || next - current < config.min_gain {
            break;
        }
        current = next;
    }

    state
}

/// Renumber community ids contiguously in order of first appearance
fn renumber(partition: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping = std::collections::HashMap::new();
    let renumbered = partition
        .iter()
        .map(|&c| {
            let next = mapping.len();
            *mapping.entry(c).or_insert(next)
        })
        .collect();
    (renumbered, mapping.len())
}

/// Louvain community detection on an undirected view
pub fn louvain(view: &GraphView, config: &LouvainConfig) -> LouvainResult {
    let n = view.node_count;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut graph = WeightedGraph::from_view(view);

    // Community of each original node
    let mut partition: Vec<usize> = (0..n).collect();
    let mut levels = 0;

    if graph.total_weight <= 0.0 {
        return LouvainResult { partition, modularity: 0.0, levels };
    }

    let mut best_modularity = LevelState::singletons(&graph).modularity(&graph, config.resolution);

    loop {
        let state = one_level(&graph, config, &mut rng);
        let level_modularity = state.modularity(&graph, config.resolution);

        // The first level is always kept, later ones only if they improve.
        if levels > 0 && level_modularity - best_modularity < config.min_gain {
            break;
        }

        let (level_partition, communities) = renumber(&state.node_community);
        for c in partition.iter_mut() {
            *c = level_partition[*c];
        }
        levels += 1;
        best_modularity = level_modularity;

        if communities == graph.node_count() {
            break;
        }
        graph = graph.aggregate(&level_partition, communities);
    }

    let modularity = modularity(view, &partition, config.resolution);
    LouvainResult { partition, modularity, levels }
}

/// Modularity of a partition of an undirected view
///
/// Returns 0 for graphs without edges.
pub fn modularity(view: &GraphView, partition: &[usize], resolution: f64) -> f64 {
    let graph = WeightedGraph::from_view(view);
    let m = graph.total_weight;
    if m <= 0.0 {
        return 0.0;
    }

    let communities = partition.iter().max().map(|&c| c + 1).unwrap_or(0);
    let mut internal = vec![0.0; communities];
    let mut degree = vec![0.0; communities];

    for u in 0..graph.node_count() {
        let cu = partition[u];
        degree[cu] += graph.degrees[u];
        internal[cu] += graph.self_loops[u];
        for &(v, w) in &graph.adjacency[u] {
            if partition[v] == cu {
                internal[cu] += w / 2.0;
            }
        }
    }

    internal
        .iter()
        .zip(&degree)
        .map(|(&l, &d)| l / m - resolution * (d / (2.0 * m)).powi(2))
        .sum()
}
