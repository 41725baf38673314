use std::collections::BTreeSet;

use crate::bond::BondOrder;
use crate::element::Element;
use crate::hybridization::Hybridization;
use crate::molecule::MoleculeGraph;

/// What an atom must agree on to be paired with another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct AtomLabel {
    pub(super) element: Element,
    pub(super) hybridization: Option<Hybridization>,
}

/// Flattened, read-only view of one or more molecules for searching.
///
/// Fragments are laid out one after the other, so atom `i` of the second
/// fragment has index `first.atom_count() + i`. Neighbour lists are sorted.
#[derive(Clone, Debug)]
pub(super) struct MatchGraph {
    labels: Vec<AtomLabel>,
    adjacency: Vec<Vec<(usize, BondOrder)>>,
}

impl MatchGraph {
    pub(super) fn from_fragments(fragments: &[&MoleculeGraph]) -> Self {
        let total = fragments.iter().map(|m| m.atom_count()).sum();
        let mut labels = Vec::with_capacity(total);
        let mut adjacency = Vec::with_capacity(total);
        let mut offset = 0;
        for mol in fragments {
            let graph = mol.graph();
            for idx in graph.atoms() {
                labels.push(AtomLabel {
                    element: graph.atom(idx).element,
                    hybridization: mol.hybridization(idx),
                });
                let mut neighbors: Vec<(usize, BondOrder)> = graph
                    .bonds_of(idx)
                    .filter_map(|edge| {
                        let (a, b) = graph.bond_endpoints(edge)?;
                        let other = if a == idx { b } else { a };
                        Some((offset + other.index(), graph.bond(edge).order))
                    })
                    .collect();
                neighbors.sort();
                adjacency.push(neighbors);
            }
            offset += mol.atom_count();
        }
        Self { labels, adjacency }
    }

    pub(super) fn len(&self) -> usize {
        self.labels.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub(super) fn label(&self, atom: usize) -> AtomLabel {
        self.labels[atom]
    }

    pub(super) fn neighbors(&self, atom: usize) -> &[(usize, BondOrder)] {
        &self.adjacency[atom]
    }

    pub(super) fn bond(&self, a: usize, b: usize) -> Option<BondOrder> {
        let list = &self.adjacency[a];
        list.binary_search_by_key(&b, |&(nb, _)| nb)
            .ok()
            .map(|i| list[i].1)
    }
}

/// Partial injective mapping from pattern atoms to target atoms, with the
/// terminal sets of both sides.
#[derive(Clone, Debug)]
pub(super) struct MatchState {
    core_pattern: Vec<Option<usize>>,
    core_target: Vec<Option<usize>>,
    term_pattern: BTreeSet<usize>,
    term_target: BTreeSet<usize>,
    depth: usize,
}

/// Everything needed to undo one [`MatchState::extend`].
#[derive(Clone, Debug)]
pub(super) struct Backup {
    pattern: usize,
    target: usize,
    term_pattern: BTreeSet<usize>,
    term_target: BTreeSet<usize>,
}

impl MatchState {
    pub(super) fn new(pattern_len: usize, target_len: usize) -> Self {
        Self {
            core_pattern: vec![None; pattern_len],
            core_target: vec![None; target_len],
            term_pattern: BTreeSet::new(),
            term_target: BTreeSet::new(),
            depth: 0,
        }
    }

    pub(super) fn depth(&self) -> usize {
        self.depth
    }

    pub(super) fn is_covering(&self) -> bool {
        self.depth == self.core_pattern.len()
    }

    pub(super) fn image(&self, pattern: usize) -> Option<usize> {
        self.core_pattern[pattern]
    }

    pub(super) fn preimage(&self, target: usize) -> Option<usize> {
        self.core_target[target]
    }

    pub(super) fn in_pattern_terminal(&self, atom: usize) -> bool {
        self.term_pattern.contains(&atom)
    }

    pub(super) fn in_target_terminal(&self, atom: usize) -> bool {
        self.term_target.contains(&atom)
    }

    /// Next pattern atom to map and the target atoms to try for it.
    ///
    /// Drawn from the terminal sets when both are non-empty, otherwise from
    /// all unmapped atoms. The pattern side always contributes its smallest
    /// eligible atom.
    pub(super) fn candidates(&self) -> Option<(usize, Vec<usize>)> {
        if !self.term_pattern.is_empty() && !self.term_target.is_empty() {
            let &n = self.term_pattern.iter().next()?;
            return Some((n, self.term_target.iter().copied().collect()));
        }
        let n = self.core_pattern.iter().position(Option::is_none)?;
        let targets = self
            .core_target
            .iter()
            .enumerate()
            .filter(|(_, image)| image.is_none())
            .map(|(m, _)| m)
            .collect();
        Some((n, targets))
    }

    /// Maps `pattern` to `target` and returns the backup that undoes it.
    pub(super) fn extend(
        &mut self,
        pattern: usize,
        target: usize,
        pattern_graph: &MatchGraph,
        target_graph: &MatchGraph,
    ) -> Backup {
        let backup = Backup {
            pattern,
            target,
            term_pattern: self.term_pattern.clone(),
            term_target: self.term_target.clone(),
        };
        self.core_pattern[pattern] = Some(target);
        self.core_target[target] = Some(pattern);
        self.depth += 1;

        self.term_pattern.remove(&pattern);
        self.term_target.remove(&target);
        for &(nb, _) in pattern_graph.neighbors(pattern) {
            if self.core_pattern[nb].is_none() {
                self.term_pattern.insert(nb);
            }
        }
        for &(nb, _) in target_graph.neighbors(target) {
            if self.core_target[nb].is_none() {
                self.term_target.insert(nb);
            }
        }
        backup
    }

    pub(super) fn restore(&mut self, backup: Backup) {
        self.core_pattern[backup.pattern] = None;
        self.core_target[backup.target] = None;
        self.term_pattern = backup.term_pattern;
        self.term_target = backup.term_target;
        self.depth -= 1;
    }

    /// The current mapping as (pattern, target) pairs in pattern order.
    pub(super) fn pairs(&self) -> Vec<(usize, usize)> {
        self.core_pattern
            .iter()
            .enumerate()
            .filter_map(|(p, t)| t.map(|t| (p, t)))
            .collect()
    }
}
