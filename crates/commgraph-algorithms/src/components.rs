//! Connected components
//!
//! Union-find over the undirected view. Used for the largest connected component
//! and for robustness simulation where nodes are masked out.

use super::common::GraphView;

/// Label given to masked-out nodes
pub const NO_COMPONENT: usize = usize::MAX;

/// Result of a connected components computation
#[derive(Debug, Clone)]
pub struct ComponentResult {
    /// Component label per dense node index (contiguous, in order of lowest member index)
    pub labels: Vec<usize>,
    /// Size of each component, indexed by label
    pub sizes: Vec<usize>,
}

impl ComponentResult {
    /// Number of components
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Label of the largest component. Ties go to the lowest label.
    pub fn largest(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (label, &size) in self.sizes.iter().enumerate() {
            match best {
                Some(b) if self.sizes[b] >= size => {}
                _ => best = Some(label),
            }
        }
        best
    }

    /// Size of the largest component (0 when there are none)
    pub fn largest_size(&self) -> usize {
        self.largest().map(|l| self.sizes[l]).unwrap_or(0)
    }

    /// Membership mask for one component
    pub fn mask(&self, label: usize) -> Vec<bool> {
        self.labels.iter().map(|&l| l == label).collect()
    }
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        // Iterative with path halving; recursion overflows on long chains.
        let mut i = i;
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Connected components of an undirected view
pub fn connected_components(view: &GraphView) -> ComponentResult {
    connected_components_masked(view, &vec![true; view.node_count])
}

/// Connected components restricted to the nodes whose `active` flag is set.
///
/// Inactive nodes are labelled [`NO_COMPONENT`] and edges touching them are ignored.
pub fn connected_components_masked(view: &GraphView, active: &[bool]) -> ComponentResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u_idx in 0..n {
        if !active[u_idx] {
            continue;
        }
        for &v_idx in view.successors(u_idx) {
            if active[v_idx] {
                uf.union(u_idx, v_idx);
            }
        }
    }

    let mut root_label = vec![NO_COMPONENT; n];
    let mut labels = vec![NO_COMPONENT; n];
    let mut sizes = Vec::new();

    for i in 0..n {
        if !active[i] {
            continue;
        }
        let root = uf.find(i);
        if root_label[root] == NO_COMPONENT {
            root_label[root] = sizes.len();
            sizes.push(0);
        }
        labels[i] = root_label[root];
        sizes[root_label[root]] += 1;
    }

    ComponentResult { labels, sizes }
}

/// Subgraph induced by the largest connected component
pub fn largest_component(view: &GraphView) -> GraphView {
    let components = connected_components(view);
    match components.largest() {
        Some(label) => view.induced_subgraph(&components.mask(label)),
        None => GraphView::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_graphs::undirected;

    #[test]
    fn test_components() {
        // Nodes: 1, 2, 3, 4, 5 and an isolated self-looping 6
        // Edges: 1-2, 3-4-5
        let view = undirected(&[(1, 2), (3, 4), (4, 5), (6, 6)]);
        let result = connected_components(&view);

        assert_eq!(result.count(), 3);
        let label = |id: u64| result.labels[view.node_to_index[&id]];
        assert_eq!(label(1), label(2));
        assert_eq!(label(3), label(4));
        assert_eq!(label(4), label(5));
        assert_ne!(label(1), label(3));
        assert_eq!(result.largest_size(), 3);
        assert_eq!(result.largest(), Some(label(3)));
    }

    #[test]
    fn test_masked_components_split_path() {
        // 1-2-3-4-5, remove the middle node
        let view = undirected(&[(1, 2), (2, 3), (3, 4), (4, 5)]);
        let mut active = vec![true; view.node_count];
        active[view.node_to_index[&3]] = false;

        let result = connected_components_masked(&view, &active);
        assert_eq!(result.count(), 2);
        assert_eq!(result.largest_size(), 2);
        assert_eq!(result.labels[view.node_to_index[&3]], NO_COMPONENT);
    }

    #[test]
    fn test_largest_component_tie_takes_first() {
        let view = undirected(&[(1, 2), (3, 4)]);
        let lcc = largest_component(&view);
        assert_eq!(lcc.index_to_node, vec![1, 2]);
    }

    #[test]
    fn test_empty_view() {
        let view = GraphView::default();
        let result = connected_components(&view);
        assert_eq!(result.count(), 0);
        assert_eq!(result.largest(), None);
        assert!(largest_component(&view).is_empty());
    }
}
