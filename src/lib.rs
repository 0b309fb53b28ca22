//! Commgraph: communication network analysis
//!
//! Reads an undirected contact graph from an edge list (one `a b` pair per
//! line, `#` comments) and produces a full structural report:
//!
//! - Basic metrics: size, density, components, diameter of the largest component
//! - Centrality: degree, PageRank and sampled betweenness, each normalised
//! - Power structure: hidden influencers, information brokers, power hubs
//! - Communities: Louvain on a degree-biased sample, propagated to every node
//! - Network properties: power-law fit of the degree distribution, small-world sigma
//! - Robustness: targeted attack vs random failure
//!
//! Results land in `<output_dir>/metrics` (JSON/CSV) and `<output_dir>/plots` (SVG).
//! The graph algorithms themselves live in the `commgraph-algorithms` crate.
//!
//! ## Example Usage
//!
//! ```rust
//! use commgraph::analysis::{compute_basic_metrics, compute_centralities};
//! use commgraph::config::CentralityConfig;
//! use commgraph::graph::ContactGraph;
//!
//! let graph = ContactGraph::from_edges(&[(1, 2), (2, 3), (3, 1), (3, 4)]);
//! let basic = compute_basic_metrics(&graph, 42);
//! assert_eq!(basic.num_nodes, 4);
//! assert_eq!(basic.connected_components, 1);
//!
//! let table = compute_centralities(&graph.view, &CentralityConfig::default(), 42);
//! assert_eq!(table.top_pagerank(1)[0].node, 3);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod graph;
pub mod pipeline;
pub mod report;
pub mod viz;

// Re-export main types for convenience
pub use analysis::{
    BasicMetrics, CentralityRow, CentralityTable, CommunityReport, NetworkProperties, PowerRecord,
    PowerStructure, RobustnessReport,
};

pub use config::{AnalysisConfig, ConfigError, ConfigResult};

pub use graph::{load_graph, ContactGraph, LoadError, LoadResult};

pub use pipeline::{run, AnalysisSummary, PipelineError, PipelineOptions, PipelineResult};

pub use report::{ReportError, ReportResult};

pub use commgraph_algorithms::{GraphView, NodeId};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
