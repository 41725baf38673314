use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::graph::AtomGraph;
use crate::traversal::shortest_path_avoiding;

/// Membership of edges in a set, one bit per edge index.
///
/// Cycle-space arithmetic over GF(2) is XOR on these vectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeBits {
    words: Vec<u64>,
    num_edges: usize,
}

impl EdgeBits {
    pub fn new(num_edges: usize) -> Self {
        Self {
            words: vec![0; num_edges.div_ceil(64)],
            num_edges,
        }
    }

    /// Edge indices at or beyond `num_edges` are ignored.
    pub fn from_edges(num_edges: usize, edges: impl IntoIterator<Item = EdgeIndex>) -> Self {
        let mut bits = Self::new(num_edges);
        for edge in edges {
            bits.insert(edge);
        }
        bits
    }

    /// Edges joining consecutive atoms of a closed ring.
    pub fn from_ring(graph: &AtomGraph, ring: &[NodeIndex]) -> Self {
        let mut bits = Self::new(graph.bond_count());
        let len = ring.len();
        for i in 0..len {
            if let Some(edge) = graph.bond_between(ring[i], ring[(i + 1) % len]) {
                bits.insert(edge);
            }
        }
        bits
    }

    pub fn insert(&mut self, edge: EdgeIndex) {
        let idx = edge.index();
        if idx < self.num_edges {
            self.words[idx / 64] |= 1u64 << (idx % 64);
        }
    }

    pub fn contains(&self, edge: EdgeIndex) -> bool {
        let idx = edge.index();
        idx < self.num_edges && self.words[idx / 64] & (1u64 << (idx % 64)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Lowest set edge index.
    pub fn leading_bit(&self) -> Option<usize> {
        for (i, &word) in self.words.iter().enumerate() {
            if word != 0 {
                return Some(i * 64 + word.trailing_zeros() as usize);
            }
        }
        None
    }

    pub fn xor_assign(&mut self, other: &EdgeBits) {
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a ^= *b;
        }
    }

    /// Set edges in ascending index order.
    pub fn to_edges(&self) -> Vec<EdgeIndex> {
        (0..self.num_edges)
            .map(EdgeIndex::new)
            .filter(|&e| self.contains(e))
            .collect()
    }
}

/// One ring of a cycle basis.
///
/// Atoms are listed in cycle order, starting from the lowest index and
/// heading towards the smaller of its two ring neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ring {
    atoms: Vec<NodeIndex>,
    edges: Vec<EdgeIndex>,
}

impl Ring {
    fn new(graph: &AtomGraph, atoms: Vec<NodeIndex>) -> Self {
        let edges = EdgeBits::from_ring(graph, &atoms).to_edges();
        Self { atoms, edges }
    }

    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn edges(&self) -> &[EdgeIndex] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn contains_bond(&self, a: NodeIndex, b: NodeIndex) -> bool {
        let len = self.atoms.len();
        (0..len).any(|i| {
            let j = (i + 1) % len;
            (self.atoms[i] == a && self.atoms[j] == b) || (self.atoms[i] == b && self.atoms[j] == a)
        })
    }
}

/// A set of rings that is independent over GF(2) and, when complete,
/// spans the cycle space of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleBasis {
    rings: Vec<Ring>,
    expected: usize,
}

impl CycleBasis {
    /// Computes a cycle basis by Horton-style candidate selection.
    ///
    /// Candidates are first the shortest ring through each edge. If they do
    /// not reach the cyclomatic number, the classical vertex/edge Horton
    /// candidates are merged in and selection is redone. A basis that is
    /// still short is returned with [`is_complete`](Self::is_complete)
    /// reporting `false`.
    pub fn compute(graph: &AtomGraph) -> Self {
        let expected = cyclomatic_number(graph);
        if expected == 0 {
            return Self {
                rings: vec![],
                expected,
            };
        }

        let mut candidates = edge_candidates(graph);
        let mut rings = select_independent_rings(graph, &candidates, expected);
        if rings.len() < expected {
            tracing::debug!(
                found = rings.len(),
                expected,
                "edge candidates short of cyclomatic number, adding vertex/edge candidates"
            );
            candidates.extend(horton_candidates(graph));
            sort_candidates(&mut candidates);
            rings = select_independent_rings(graph, &candidates, expected);
        }
        if rings.len() < expected {
            tracing::warn!(found = rings.len(), expected, "incomplete cycle basis");
        }

        Self {
            rings: rings.into_iter().map(|r| Ring::new(graph, r)).collect(),
            expected,
        }
    }

    /// Builds a basis from an explicit candidate list, in the given order.
    pub fn from_candidates(graph: &AtomGraph, candidates: &[Vec<NodeIndex>]) -> Self {
        let expected = cyclomatic_number(graph);
        let rings = select_independent_rings(graph, candidates, expected);
        Self {
            rings: rings.into_iter().map(|r| Ring::new(graph, r)).collect(),
            expected,
        }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// The cyclomatic number the basis should reach.
    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn is_complete(&self) -> bool {
        self.rings.len() == self.expected
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.rings.iter().any(|ring| ring.contains(atom))
    }

    pub fn is_ring_bond(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.rings.iter().any(|ring| ring.contains_bond(a, b))
    }

    pub fn smallest_ring_size(&self, atom: NodeIndex) -> Option<usize> {
        self.rings
            .iter()
            .filter(|ring| ring.contains(atom))
            .map(Ring::len)
            .min()
    }

    pub fn atom_rings(&self, atom: NodeIndex) -> Vec<&Ring> {
        self.rings.iter().filter(|ring| ring.contains(atom)).collect()
    }
}

/// |E| − |V| + number of connected components.
pub fn cyclomatic_number(graph: &AtomGraph) -> usize {
    let v = graph.atom_count();
    let e = graph.bond_count();
    let c = connected_components(graph.graph());
    (e + c).saturating_sub(v)
}

/// The shortest ring through each edge: drop the edge, then join its ends
/// by a shortest path.
fn edge_candidates(graph: &AtomGraph) -> Vec<Vec<NodeIndex>> {
    let mut candidates = Vec::new();
    for edge in graph.bonds() {
        let Some((u, v)) = graph.bond_endpoints(edge) else {
            continue;
        };
        if let Some(path) = shortest_path_avoiding(graph, u, v, Some(edge)) {
            if path.len() >= 3 {
                candidates.push(path);
            }
        }
    }
    sort_candidates(&mut candidates);
    candidates
}

fn horton_candidates(graph: &AtomGraph) -> Vec<Vec<NodeIndex>> {
    let n = graph.atom_count();
    let pred = all_pairs_predecessors(graph, n);

    let mut candidates = Vec::new();
    for edge in graph.bonds() {
        let Some((u, v)) = graph.bond_endpoints(edge) else {
            continue;
        };
        for w in graph.atoms() {
            let (Some(path_u), Some(path_v)) =
                (reconstruct_path(&pred, w, u), reconstruct_path(&pred, w, v))
            else {
                continue;
            };
            if path_u.len() + path_v.len() < 4 || paths_share_internal_node(&path_u, &path_v) {
                continue;
            }
            let mut ring = path_u;
            ring.extend(path_v[1..].iter().rev());
            candidates.push(ring);
        }
    }
    candidates
}

// Ascending size, then ascending sorted atom tuple; duplicates of the same
// cycle collapse to one entry.
fn sort_candidates(candidates: &mut Vec<Vec<NodeIndex>>) {
    let mut keyed: Vec<(usize, Vec<NodeIndex>, Vec<NodeIndex>)> = candidates
        .drain(..)
        .map(|ring| {
            let normalized = normalize_ring(&ring);
            let mut members = normalized.clone();
            members.sort();
            (normalized.len(), members, normalized)
        })
        .collect();
    keyed.sort();
    keyed.dedup_by(|a, b| a.2 == b.2);
    candidates.extend(keyed.into_iter().map(|(_, _, ring)| ring));
}

fn all_pairs_predecessors(graph: &AtomGraph, n: usize) -> Vec<Vec<Option<NodeIndex>>> {
    let mut pred = vec![vec![None; n]; n];
    for (src_idx, row) in pred.iter_mut().enumerate() {
        let mut visited = vec![false; n];
        visited[src_idx] = true;
        let mut queue = VecDeque::new();
        queue.push_back(NodeIndex::new(src_idx));
        while let Some(cur) = queue.pop_front() {
            for nb in graph.sorted_neighbors(cur) {
                if !visited[nb.index()] {
                    visited[nb.index()] = true;
                    row[nb.index()] = Some(cur);
                    queue.push_back(nb);
                }
            }
        }
    }
    pred
}

fn reconstruct_path(
    pred: &[Vec<Option<NodeIndex>>],
    src: NodeIndex,
    dst: NodeIndex,
) -> Option<Vec<NodeIndex>> {
    let mut path = vec![dst];
    let mut cur = dst;
    while cur != src {
        cur = pred[src.index()][cur.index()]?;
        path.push(cur);
    }
    path.reverse();
    Some(path)
}

fn paths_share_internal_node(path_u: &[NodeIndex], path_v: &[NodeIndex]) -> bool {
    if path_u.len() < 2 || path_v.len() < 2 {
        return false;
    }
    path_u[1..].iter().any(|node| path_v[1..].contains(node))
}

fn select_independent_rings(
    graph: &AtomGraph,
    candidates: &[Vec<NodeIndex>],
    num_needed: usize,
) -> Vec<Vec<NodeIndex>> {
    let mut result = Vec::with_capacity(num_needed);
    let mut basis: Vec<EdgeBits> = Vec::with_capacity(num_needed);

    for ring in candidates {
        if result.len() >= num_needed {
            break;
        }
        let bv = EdgeBits::from_ring(graph, ring);
        if bv.count() != ring.len() {
            continue;
        }
        if try_add_to_basis(&mut basis, bv) {
            result.push(normalize_ring(ring));
        }
    }

    result.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    result
}

fn try_add_to_basis(basis: &mut Vec<EdgeBits>, candidate: EdgeBits) -> bool {
    let mut v = candidate;
    for row in basis.iter() {
        if let Some(p) = row.leading_bit() {
            if v.contains(EdgeIndex::new(p)) {
                v.xor_assign(row);
            }
        }
    }
    if v.is_empty() {
        return false;
    }
    basis.push(v);
    true
}

fn normalize_ring(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    let Some(min_pos) = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
    else {
        return vec![];
    };

    let len = ring.len();
    let mut normalized: Vec<NodeIndex> = (0..len).map(|i| ring[(min_pos + i) % len]).collect();
    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }
    normalized
}
