//! Graph algorithms for communication-network analysis
//!
//! Everything here runs over [`GraphView`], a dense CSR view. Undirected graphs
//! store each edge in both directions.

pub mod common;
pub mod centrality;
pub mod community;
pub mod components;
pub mod pagerank;
pub mod pathfinding;
pub mod topology;

pub use common::{GraphView, NodeId};
pub use centrality::{betweenness_centrality, degree_centrality, BetweennessConfig};
pub use community::{louvain, modularity, LouvainConfig, LouvainResult};
pub use components::{
    connected_components, connected_components_masked, largest_component, ComponentResult,
    NO_COMPONENT,
};
pub use pagerank::{page_rank, page_rank_scores, PageRankConfig, PageRankOutcome};
pub use pathfinding::{bfs_distances, mean_path_length, two_sweep_diameter, UNREACHABLE};
pub use topology::{average_clustering, count_triangles, local_clustering, transitivity};
