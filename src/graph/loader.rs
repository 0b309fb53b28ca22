//! Edge-list loading
//!
//! Whitespace-separated integer pairs, one contact per line. `#` starts a
//! comment line. The graph is undirected: `a b` and `b a` are the same contact.

use commgraph_algorithms::{largest_component, GraphView, NodeId};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Loader errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: expected two integer node ids, got {content:?}")]
    Parse { line: usize, content: String },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Counts gathered while reading the edge list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Non-comment lines read
    pub lines: usize,
    pub self_loops: usize,
    /// Lines repeating an already-seen contact (in either direction)
    pub duplicates: usize,
}

/// An undirected contact graph
#[derive(Debug, Clone)]
pub struct ContactGraph {
    pub view: GraphView,
    pub stats: LoadStats,
}

impl ContactGraph {
    /// Build from raw contact pairs
    pub fn from_edges(edges: &[(NodeId, NodeId)]) -> Self {
        let view = GraphView::from_undirected_edges(edges);
        let self_loops = edges.iter().filter(|(u, v)| u == v).count();
        let duplicates = edges.len() - self_loops - view.undirected_edge_count();

        Self {
            view,
            stats: LoadStats {
                lines: edges.len(),
                self_loops,
                duplicates,
            },
        }
    }

    pub fn node_count(&self) -> usize {
        self.view.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.view.undirected_edge_count()
    }

    /// Largest connected component as its own view
    pub fn largest_component(&self) -> GraphView {
        largest_component(&self.view)
    }
}

/// Parse an edge list from any reader
pub fn parse_edge_list<R: BufRead>(reader: R) -> LoadResult<Vec<(NodeId, NodeId)>> {
    let mut edges = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let parse = |field: Option<&str>| field.and_then(|f| f.parse::<NodeId>().ok());
        match (parse(fields.next()), parse(fields.next())) {
            (Some(u), Some(v)) => edges.push((u, v)),
            _ => {
                return Err(LoadError::Parse {
                    line: line_no + 1,
                    content: trimmed.to_string(),
                })
            }
        }
    }

    Ok(edges)
}

/// Load an undirected graph from an edge-list file
pub fn load_graph(path: impl AsRef<Path>) -> LoadResult<ContactGraph> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path)?;
    let edges = parse_edge_list(BufReader::new(file))?;
    let graph = ContactGraph::from_edges(&edges);

    if graph.stats.self_loops > 0 {
        warn!(count = graph.stats.self_loops, "Skipped self-loops");
    }
    if graph.stats.duplicates > 0 {
        info!(count = graph.stats.duplicates, "Collapsed repeated contacts");
    }
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded graph from {}",
        path.display()
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let input = "# Directed graph: Email-Enron.txt\n# FromNodeId\tToNodeId\n0\t1\n\n1\t0\n1 2 extra\n";
        let edges = parse_edge_list(Cursor::new(input)).unwrap();
        assert_eq!(edges, vec![(0, 1), (1, 0), (1, 2)]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let input = "# header\n1 2\n3 x\n";
        match parse_edge_list(Cursor::new(input)) {
            Err(LoadError::Parse { line, content }) => {
                assert_eq!(line, 3);
                assert_eq!(content, "3 x");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_single_column_is_rejected() {
        assert!(parse_edge_list(Cursor::new("42\n")).is_err());
    }

    #[test]
    fn test_reciprocal_contacts_collapse() {
        let graph = ContactGraph::from_edges(&[(0, 1), (1, 0), (1, 2), (2, 2)]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.stats.self_loops, 1);
        assert_eq!(graph.stats.duplicates, 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_graph("/no/such/edges.txt").unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
