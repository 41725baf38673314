use std::collections::VecDeque;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::graph::AtomGraph;

/// Breadth-first shortest path from `from` to `to`, both ends included.
///
/// Neighbours are expanded in ascending index order, so ties between paths
/// of equal length are always broken the same way. Returns `None` when the
/// atoms are not connected or either index is out of range.
pub fn shortest_path(graph: &AtomGraph, from: NodeIndex, to: NodeIndex) -> Option<Vec<NodeIndex>> {
    shortest_path_avoiding(graph, from, to, None)
}

/// Like [`shortest_path`], but never walks across `skip`.
pub fn shortest_path_avoiding(
    graph: &AtomGraph,
    from: NodeIndex,
    to: NodeIndex,
    skip: Option<EdgeIndex>,
) -> Option<Vec<NodeIndex>> {
    let n = graph.atom_count();
    if from.index() >= n || to.index() >= n {
        return None;
    }
    if from == to {
        return Some(vec![from]);
    }
    let mut pred = vec![None; n];
    let mut visited = vec![false; n];
    visited[from.index()] = true;
    let mut queue = VecDeque::new();
    queue.push_back(from);
    while let Some(current) = queue.pop_front() {
        for (edge, neighbor) in sorted_edges(graph, current) {
            if Some(edge) == skip || visited[neighbor.index()] {
                continue;
            }
            visited[neighbor.index()] = true;
            pred[neighbor.index()] = Some(current);
            if neighbor == to {
                let mut path = vec![to];
                let mut node = to;
                while let Some(p) = pred[node.index()] {
                    path.push(p);
                    node = p;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(neighbor);
        }
    }
    None
}

fn sorted_edges(graph: &AtomGraph, atom: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
    let mut edges: Vec<(EdgeIndex, NodeIndex)> = graph
        .graph()
        .edges(atom)
        .map(|e| {
            let other = if e.source() == atom { e.target() } else { e.source() };
            (e.id(), other)
        })
        .collect();
    edges.sort_by_key(|&(_, nb)| nb);
    edges
}

/// Result of a depth-first traversal: every edge reached from the start atom
/// is either a tree edge or a back edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfsTree {
    /// Atoms in the order they were discovered.
    pub order: Vec<NodeIndex>,
    /// Spanning-tree edges.
    pub tree_edges: Vec<EdgeIndex>,
    /// Edges closing a cycle. For a connected graph there are exactly
    /// |E| − |V| + 1 of them.
    pub back_edges: Vec<EdgeIndex>,
    parent: Vec<Option<NodeIndex>>,
    depth: Vec<usize>,
}

impl DfsTree {
    pub fn parent(&self, atom: NodeIndex) -> Option<NodeIndex> {
        self.parent.get(atom.index()).copied().flatten()
    }

    pub fn contains(&self, atom: NodeIndex) -> bool {
        self.order.contains(&atom)
    }

    /// The unique path between `a` and `b` through tree edges only.
    pub fn tree_path(&self, a: NodeIndex, b: NodeIndex) -> Option<Vec<NodeIndex>> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        let mut up = vec![a];
        let mut down = vec![b];
        let (mut x, mut y) = (a, b);
        while self.depth[x.index()] > self.depth[y.index()] {
            x = self.parent(x)?;
            up.push(x);
        }
        while self.depth[y.index()] > self.depth[x.index()] {
            y = self.parent(y)?;
            down.push(y);
        }
        while x != y {
            x = self.parent(x)?;
            y = self.parent(y)?;
            up.push(x);
            down.push(y);
        }
        down.pop();
        up.extend(down.into_iter().rev());
        Some(up)
    }
}

/// Iterative depth-first search from `start`, visiting neighbours in
/// ascending index order. Each edge is classified once.
pub fn depth_first_search(graph: &AtomGraph, start: NodeIndex) -> DfsTree {
    let n = graph.atom_count();
    let mut tree = DfsTree {
        parent: vec![None; n],
        depth: vec![0; n],
        ..DfsTree::default()
    };
    if start.index() >= n {
        return tree;
    }
    let mut visited = vec![false; n];
    let mut edge_seen = vec![false; graph.bond_count()];
    visited[start.index()] = true;
    tree.order.push(start);

    let mut stack = vec![(start, sorted_edges(graph, start), 0usize)];
    while let Some((node, edges, cursor)) = stack.last_mut() {
        let Some(&(edge, neighbor)) = edges.get(*cursor) else {
            stack.pop();
            continue;
        };
        *cursor += 1;
        let node = *node;
        if edge_seen[edge.index()] {
            continue;
        }
        edge_seen[edge.index()] = true;
        if visited[neighbor.index()] {
            tree.back_edges.push(edge);
            continue;
        }
        visited[neighbor.index()] = true;
        tree.parent[neighbor.index()] = Some(node);
        tree.depth[neighbor.index()] = tree.depth[node.index()] + 1;
        tree.tree_edges.push(edge);
        tree.order.push(neighbor);
        stack.push((neighbor, sorted_edges(graph, neighbor), 0));
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;
    use crate::element::Element;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn ring(size: usize) -> AtomGraph {
        let mut g = AtomGraph::new();
        for _ in 0..size {
            g.add_atom(Atom::new(Element::C));
        }
        for i in 0..size {
            g.add_bond(n(i), n((i + 1) % size), Bond::single()).unwrap();
        }
        g
    }

    #[test]
    fn shortest_path_around_ring() {
        let g = ring(6);
        assert_eq!(shortest_path(&g, n(0), n(2)), Some(vec![n(0), n(1), n(2)]));
        assert_eq!(shortest_path(&g, n(0), n(4)), Some(vec![n(0), n(5), n(4)]));
        assert_eq!(shortest_path(&g, n(0), n(3)).map(|p| p.len()), Some(4));
    }

    #[test]
    fn shortest_path_to_self() {
        let g = ring(3);
        assert_eq!(shortest_path(&g, n(1), n(1)), Some(vec![n(1)]));
    }

    #[test]
    fn no_path_between_components() {
        let mut g = ring(3);
        let lone = g.add_atom(Atom::new(Element::O));
        assert_eq!(shortest_path(&g, n(0), lone), None);
        assert_eq!(shortest_path(&g, n(0), n(42)), None);
    }

    #[test]
    fn avoiding_an_edge_goes_the_long_way() {
        let g = ring(5);
        let e = g.bond_between(n(0), n(1)).unwrap();
        let path = shortest_path_avoiding(&g, n(0), n(1), Some(e)).unwrap();
        assert_eq!(path, vec![n(0), n(4), n(3), n(2), n(1)]);
    }

    #[test]
    fn dfs_on_ring_has_one_back_edge() {
        let g = ring(6);
        let tree = depth_first_search(&g, n(0));
        assert_eq!(tree.order.len(), 6);
        assert_eq!(tree.tree_edges.len(), 5);
        assert_eq!(tree.back_edges.len(), 1);
    }

    #[test]
    fn dfs_tree_path_is_a_walk() {
        let g = ring(6);
        let tree = depth_first_search(&g, n(0));
        let path = tree.tree_path(n(0), n(5)).unwrap();
        assert_eq!(path.first(), Some(&n(0)));
        assert_eq!(path.last(), Some(&n(5)));
        for pair in path.windows(2) {
            assert!(g.bond_between(pair[0], pair[1]).is_some());
        }
        // The tree runs 0-1-2-3-4-5, so the tree path is the long way round.
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn dfs_from_out_of_range_start_is_empty() {
        let g = ring(3);
        let tree = depth_first_search(&g, n(7));
        assert!(tree.order.is_empty());
        assert!(tree.tree_path(n(0), n(1)).is_none());
    }
}
