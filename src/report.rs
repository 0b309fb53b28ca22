//! Metric files: pretty JSON documents and CSV tables

use crate::analysis::CentralityTable;
use commgraph_algorithms::GraphView;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors writing reports
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn create(path: &Path) -> ReportResult<BufWriter<File>> {
    File::create(path).map(BufWriter::new).map_err(io_err(path))
}

/// Write any serializable value as indented JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> ReportResult<()> {
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n").map_err(io_err(path))?;
    out.flush().map_err(io_err(path))?;
    debug!(path = %path.display(), "Wrote JSON");
    Ok(())
}

/// Header of `centrality.csv`
pub const CENTRALITY_COLUMNS: [&str; 7] = [
    "node",
    "degree",
    "pagerank",
    "betweenness",
    "degree_norm",
    "pagerank_norm",
    "betweenness_norm",
];

/// One row per node, in graph order
pub fn write_centrality_csv(path: &Path, table: &CentralityTable) -> ReportResult<()> {
    let mut out = create(path)?;
    writeln!(out, "{}", CENTRALITY_COLUMNS.join(",")).map_err(io_err(path))?;
    for row in &table.rows {
        let cells = [
            row.node.to_string(),
            row.degree.to_string(),
            row.pagerank.to_string(),
            row.betweenness.to_string(),
            row.degree_norm.to_string(),
            row.pagerank_norm.to_string(),
            row.betweenness_norm.to_string(),
        ];
        writeln!(out, "{}", cells.join(",")).map_err(io_err(path))?;
    }
    out.flush().map_err(io_err(path))?;
    debug!(path = %path.display(), rows = table.len(), "Wrote centrality table");
    Ok(())
}

/// `node,community` for every node of `component`
pub fn write_community_assignments_csv(
    path: &Path,
    component: &GraphView,
    partition: &[usize],
) -> ReportResult<()> {
    let mut out = create(path)?;
    writeln!(out, "node,community").map_err(io_err(path))?;
    for (idx, community) in partition.iter().enumerate() {
        writeln!(out, "{},{}", component.index_to_node[idx], community).map_err(io_err(path))?;
    }
    out.flush().map_err(io_err(path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CentralityRow;
    use tempfile::TempDir;

    #[test]
    fn test_centrality_csv_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("centrality.csv");
        let table = CentralityTable {
            rows: vec![CentralityRow {
                node: 7,
                degree: 3,
                pagerank: 0.5,
                betweenness: 0.25,
                degree_norm: 1.0,
                pagerank_norm: 1.0,
                betweenness_norm: 1.0,
            }],
        };
        write_centrality_csv(&path, &table).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "node,degree,pagerank,betweenness,degree_norm,pagerank_norm,betweenness_norm"
        );
        assert_eq!(lines[1], "7,3,0.5,0.25,1,1,1");
    }

    #[test]
    fn test_json_round_trips_through_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.json");
        write_json(&path, &serde_json::json!({"num_nodes": 3})).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["num_nodes"], 3);
    }

    #[test]
    fn test_assignments_use_original_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assign.csv");
        let view = GraphView::from_undirected_edges(&[(10, 20), (20, 30)]);
        write_community_assignments_csv(&path, &view, &[0, 0, 1]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "node,community\n10,0\n20,0\n30,1\n");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("x.json");
        let err = write_json(&path, &1).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
