use std::fmt;

use petgraph::graph::NodeIndex;

use crate::bond::BondOrder;
use crate::graph::AtomGraph;
use crate::rings::CycleBasis;
use crate::valence::total_valence;

/// Orbital hybridization of a carbon atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hybridization {
    SP,
    SP2,
    SP3,
}

impl fmt::Display for Hybridization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hybridization::SP => "sp",
            Hybridization::SP2 => "sp2",
            Hybridization::SP3 => "sp3",
        })
    }
}

// Below this size a ring cannot accommodate the linear geometry of an sp carbon.
const MIN_RING_FOR_SP: usize = 8;

pub fn assign_hybridization_atom(
    graph: &AtomGraph,
    rings: &CycleBasis,
    idx: NodeIndex,
) -> Option<Hybridization> {
    if !graph.atom(idx).element.is_carbon() {
        return None;
    }

    let mut doubles = 0;
    let mut aromatic = false;
    for edge in graph.bonds_of(idx) {
        match graph.bond(edge).order {
            BondOrder::Triple => return Some(Hybridization::SP),
            BondOrder::Double => doubles += 1,
            BondOrder::Aromatic => aromatic = true,
            BondOrder::Single => {}
        }
    }
    if doubles >= 2 {
        return Some(Hybridization::SP);
    }
    if doubles == 1 || aromatic {
        return Some(Hybridization::SP2);
    }

    match total_valence(graph, idx)? {
        4 => Some(Hybridization::SP3),
        3 => Some(Hybridization::SP2),
        2 => match rings.smallest_ring_size(idx) {
            Some(size) if size < MIN_RING_FOR_SP => Some(Hybridization::SP2),
            _ => Some(Hybridization::SP),
        },
        _ => None,
    }
}

pub fn assign_hybridization(graph: &AtomGraph, rings: &CycleBasis) -> Vec<Option<Hybridization>> {
    graph
        .atoms()
        .map(|idx| assign_hybridization_atom(graph, rings, idx))
        .collect()
}
