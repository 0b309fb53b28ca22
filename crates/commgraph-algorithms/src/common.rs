//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

use std::collections::{HashMap, HashSet};

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Undirected views store every edge in both directions, so `successors(i)` and
/// `predecessors(i)` hold the same neighbors and `neighbors(i)` can be used for either.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,

    /// Edge weights: aligned with `out_targets`
    pub weights: Option<Vec<f64>>,
}

impl GraphView {
    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Degree of a node in an undirected view
    pub fn degree(&self, idx: usize) -> usize {
        self.out_degree(idx)
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Neighbors of a node in an undirected view
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        self.successors(idx)
    }

    /// Get weights for outgoing edges of a node
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| {
            let start = self.out_offsets[idx];
            let end = self.out_offsets[idx + 1];
            &w[start..end]
        })
    }

    /// Number of undirected edges (each stored twice in the CSR arrays)
    pub fn undirected_edge_count(&self) -> usize {
        self.out_targets.len() / 2
    }

    /// Whether the view holds no nodes
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Helper to create GraphView from adjacency lists
    pub fn from_adjacency_list(
        node_count: usize,
        index_to_node: Vec<NodeId>,
        node_to_index: HashMap<NodeId, usize>,
        outgoing: Vec<Vec<usize>>,
        incoming: Vec<Vec<usize>>,
        weights: Option<Vec<Vec<f64>>>,
    ) -> Self {
        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::new();
        let mut flat_weights = if weights.is_some() { Some(Vec::new()) } else { None };

        out_offsets.push(0);
        for (i, neighbors) in outgoing.into_iter().enumerate() {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());

            if let Some(ref mut w_flat) = flat_weights {
                if let Some(w_row) = weights.as_ref().map(|w| &w[i]) {
                    w_flat.extend(w_row.iter());
                }
            }
        }

        in_offsets.push(0);
        for sources in incoming {
            in_sources.extend(sources);
            in_offsets.push(in_sources.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
            weights: flat_weights,
        }
    }

    /// Build an undirected view from an edge list.
    ///
    /// Nodes are indexed in order of first appearance. Parallel edges collapse into one
    /// and self-loops are dropped (their endpoint is still registered as a node).
    pub fn from_undirected_edges(edges: &[(NodeId, NodeId)]) -> Self {
        let mut index_to_node = Vec::new();
        let mut node_to_index = HashMap::new();
        let mut adjacency: Vec<Vec<usize>> = Vec::new();
        let mut seen = HashSet::with_capacity(edges.len());

        let mut intern = |id: NodeId, adjacency: &mut Vec<Vec<usize>>| -> usize {
            *node_to_index.entry(id).or_insert_with(|| {
                index_to_node.push(id);
                adjacency.push(Vec::new());
                index_to_node.len() - 1
            })
        };

        for &(u, v) in edges {
            let u_idx = intern(u, &mut adjacency);
            let v_idx = intern(v, &mut adjacency);
            if u_idx == v_idx {
                continue;
            }
            let key = (u_idx.min(v_idx), u_idx.max(v_idx));
            if seen.insert(key) {
                adjacency[u_idx].push(v_idx);
                adjacency[v_idx].push(u_idx);
            }
        }

        let node_count = index_to_node.len();
        Self::from_adjacency_list(
            node_count,
            index_to_node,
            node_to_index,
            adjacency.clone(),
            adjacency,
            None,
        )
    }

    /// Subgraph induced by the nodes whose `keep` flag is set.
    ///
    /// Kept nodes preserve their relative order and neighbor order.
    pub fn induced_subgraph(&self, keep: &[bool]) -> GraphView {
        let mut old_to_new = vec![usize::MAX; self.node_count];
        let mut index_to_node = Vec::new();
        let mut node_to_index = HashMap::new();

        for idx in 0..self.node_count {
            if keep[idx] {
                let new_idx = index_to_node.len();
                old_to_new[idx] = new_idx;
                index_to_node.push(self.index_to_node[idx]);
                node_to_index.insert(self.index_to_node[idx], new_idx);
            }
        }

        let node_count = index_to_node.len();
        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        let mut weights = self.weights.as_ref().map(|_| vec![Vec::new(); node_count]);

        for idx in 0..self.node_count {
            let new_u = old_to_new[idx];
            if new_u == usize::MAX {
                continue;
            }
            let row_weights = self.weights(idx);
            for (pos, &target) in self.successors(idx).iter().enumerate() {
                let new_v = old_to_new[target];
                if new_v == usize::MAX {
                    continue;
                }
                outgoing[new_u].push(new_v);
                if let (Some(w), Some(row)) = (weights.as_mut(), row_weights) {
                    w[new_u].push(row[pos]);
                }
            }
            for &source in self.predecessors(idx) {
                let new_v = old_to_new[source];
                if new_v != usize::MAX {
                    incoming[new_u].push(new_v);
                }
            }
        }

        Self::from_adjacency_list(
            node_count,
            index_to_node,
            node_to_index,
            outgoing,
            incoming,
            weights,
        )
    }
}

#[cfg(test)]
pub(crate) mod test_graphs {
    use super::*;

    /// Undirected view over the given edges
    pub fn undirected(edges: &[(NodeId, NodeId)]) -> GraphView {
        GraphView::from_undirected_edges(edges)
    }

    /// Two 4-cliques {1..4} and {5..8} joined by the bridge 4-5
    pub fn barbell() -> GraphView {
        let mut edges = Vec::new();
        for group in [[1u64, 2, 3, 4], [5, 6, 7, 8]] {
            for i in 0..group.len() {
                for j in (i + 1)..group.len() {
                    edges.push((group[i], group[j]));
                }
            }
        }
        edges.push((4, 5));
        undirected(&edges)
    }

    /// Complete graph on `n` nodes labelled 0..n
    pub fn complete(n: u64) -> GraphView {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j));
            }
        }
        undirected(&edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undirected_dedup_and_self_loops() {
        let view = GraphView::from_undirected_edges(&[(1, 2), (2, 1), (2, 3), (3, 3), (1, 2)]);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.undirected_edge_count(), 2);
        assert_eq!(view.index_to_node, vec![1, 2, 3]);

        let two = view.node_to_index[&2];
        assert_eq!(view.degree(two), 2);
        let three = view.node_to_index[&3];
        assert_eq!(view.neighbors(three), &[two]);
    }

    #[test]
    fn test_induced_subgraph() {
        // 1-2-3-4 path, drop node 3
        let view = GraphView::from_undirected_edges(&[(1, 2), (2, 3), (3, 4)]);
        let keep: Vec<bool> = view.index_to_node.iter().map(|&id| id != 3).collect();
        let sub = view.induced_subgraph(&keep);

        assert_eq!(sub.node_count, 3);
        assert_eq!(sub.undirected_edge_count(), 1);
        assert_eq!(sub.index_to_node, vec![1, 2, 4]);
        assert_eq!(sub.degree(sub.node_to_index[&4]), 0);
    }
}
