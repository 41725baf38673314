use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::atom::Atom;
use crate::bond::Bond;

/// Errors produced when assembling an [`AtomGraph`] or promoting one to a
/// [`MoleculeGraph`](crate::MoleculeGraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A bond endpoint does not name an atom of the graph.
    AtomOutOfRange { index: usize, atom_count: usize },
    /// A bond joins an atom to itself.
    SelfBond { index: usize },
    /// The graph has no atoms.
    Empty,
    /// The graph splits into more than one connected component.
    Disconnected { components: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtomOutOfRange { index, atom_count } => write!(
                f,
                "atom index {} out of range for a graph of {} atoms",
                index, atom_count
            ),
            Self::SelfBond { index } => write!(f, "atom {} is bonded to itself", index),
            Self::Empty => write!(f, "graph has no atoms"),
            Self::Disconnected { components } => {
                write!(f, "graph has {} disconnected components", components)
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Atom and bond storage for a molecular structure.
///
/// Atom indices are petgraph [`NodeIndex`] values, dense and stable because
/// atoms are never removed. Every bond endpoint is checked against the atom
/// list when the bond is added.
#[derive(Clone, Default)]
pub struct AtomGraph {
    graph: UnGraph<Atom, Bond>,
}

impl AtomGraph {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
        }
    }

    pub fn with_capacity(atoms: usize, bonds: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(atoms, bonds),
        }
    }

    pub fn graph(&self) -> &UnGraph<Atom, Bond> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &Atom {
        &self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &Bond {
        &self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        self.graph.add_node(atom)
    }

    /// Adds a bond between two existing atoms.
    ///
    /// Adding a bond that is already present returns the existing edge and
    /// leaves its order untouched.
    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: Bond) -> Result<EdgeIndex, GraphError> {
        let atom_count = self.atom_count();
        for idx in [a, b] {
            if idx.index() >= atom_count {
                return Err(GraphError::AtomOutOfRange {
                    index: idx.index(),
                    atom_count,
                });
            }
        }
        if a == b {
            return Err(GraphError::SelfBond { index: a.index() });
        }
        if let Some(existing) = self.graph.find_edge(a, b) {
            return Ok(existing);
        }
        Ok(self.graph.add_edge(a, b, bond))
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    /// Neighbours of `idx` in ascending index order.
    pub fn sorted_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut nbrs: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        nbrs.sort();
        nbrs
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// Connected components, each as a sorted list of atoms. Components are
    /// ordered by their lowest atom index.
    pub fn components(&self) -> Vec<Vec<NodeIndex>> {
        let n = self.atom_count();
        let mut visited = vec![false; n];
        let mut components = Vec::new();
        for node in self.atoms() {
            if visited[node.index()] {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![node];
            while let Some(current) = stack.pop() {
                if visited[current.index()] {
                    continue;
                }
                visited[current.index()] = true;
                component.push(current);
                stack.extend(self.neighbors(current).filter(|nb| !visited[nb.index()]));
            }
            component.sort();
            components.push(component);
        }
        components
    }

    pub fn is_connected(&self) -> bool {
        self.components().len() <= 1
    }

    /// Splits the graph into one graph per connected component. Atoms keep
    /// their relative order inside each fragment.
    pub fn fragments(&self) -> Vec<AtomGraph> {
        let components = self.components();
        let mut fragments = Vec::with_capacity(components.len());
        let mut index_map = vec![NodeIndex::end(); self.atom_count()];
        let mut owner = vec![0usize; self.atom_count()];
        for (comp_id, component) in components.iter().enumerate() {
            let mut frag = AtomGraph::with_capacity(component.len(), component.len());
            for &old in component {
                index_map[old.index()] = frag.add_atom(*self.atom(old));
                owner[old.index()] = comp_id;
            }
            fragments.push(frag);
        }
        for edge in self.bonds() {
            let Some((a, b)) = self.bond_endpoints(edge) else {
                continue;
            };
            fragments[owner[a.index()]].graph.add_edge(
                index_map[a.index()],
                index_map[b.index()],
                *self.bond(edge),
            );
        }
        fragments
    }
}

impl fmt::Debug for AtomGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomGraph")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .finish()
    }
}
