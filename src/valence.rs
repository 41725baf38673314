use petgraph::graph::NodeIndex;

use crate::graph::AtomGraph;

/// Number of bonds touching `atom`.
pub fn valence(graph: &AtomGraph, atom: NodeIndex) -> usize {
    graph.degree(atom)
}

/// Bonds plus fixed hydrogens on `atom`.
///
/// Undefined for an atom in a mobile-hydrogen group, whose hydrogen count is
/// not fixed, and for an atom whose hydrogens were never given.
pub fn total_valence(graph: &AtomGraph, atom: NodeIndex) -> Option<usize> {
    let a = graph.atom(atom);
    if a.mobile_hydrogen {
        return None;
    }
    Some(graph.degree(atom) + a.hydrogen_count? as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;
    use crate::element::Element;

    #[test]
    fn methyl_carbon() {
        let mut g = AtomGraph::new();
        let c = g.add_atom(Atom::new(Element::C).with_hydrogens(3));
        let o = g.add_atom(Atom::new(Element::O).with_hydrogens(1));
        g.add_bond(c, o, Bond::single()).unwrap();
        assert_eq!(valence(&g, c), 1);
        assert_eq!(total_valence(&g, c), Some(4));
        assert_eq!(total_valence(&g, o), Some(2));
    }

    #[test]
    fn mobile_hydrogen_is_undefined() {
        let mut g = AtomGraph::new();
        let n = g.add_atom(Atom::new(Element::N).with_mobile_hydrogen());
        assert_eq!(valence(&g, n), 0);
        assert_eq!(total_valence(&g, n), None);
    }

    #[test]
    fn unknown_hydrogens_are_undefined() {
        let mut g = AtomGraph::new();
        let c = g.add_atom(Atom::new(Element::C).with_unknown_hydrogens());
        let o = g.add_atom(Atom::new(Element::O));
        g.add_bond(c, o, Bond::single()).unwrap();
        assert_eq!(valence(&g, c), 1);
        assert_eq!(total_valence(&g, c), None);
        assert_eq!(total_valence(&g, o), Some(1));
    }
}
