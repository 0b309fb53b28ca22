//! Contact graph model and edge-list loading

pub mod loader;

pub use loader::{load_graph, parse_edge_list, ContactGraph, LoadError, LoadResult, LoadStats};
