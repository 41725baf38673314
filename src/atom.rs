use crate::element::Element;

/// Atom type for a molecular graph node.
///
/// `Atom` stores what the identifier layers say about an atom: its element
/// and the hydrogens attached to it. Valence and hybridization depend on the
/// surrounding graph and are derived by
/// [`MoleculeGraph`](crate::MoleculeGraph) on demand.
///
/// # Examples
///
/// ```
/// use molgraph::{Atom, Element};
///
/// let methyl = Atom::new(Element::C).with_hydrogens(3);
/// assert_eq!(methyl.hydrogen_count, Some(3));
/// assert!(!methyl.mobile_hydrogen);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom {
    /// Element of the atom.
    pub element: Element,
    /// Number of fixed (non-mobile) hydrogens attached to this atom, or
    /// `None` when the input carried no hydrogen information at all.
    ///
    /// Hydrogens are never graph nodes, except for the lone atom of a
    /// hydrogen-only formula such as `H2`.
    pub hydrogen_count: Option<u8>,
    /// Whether the atom takes part in a mobile-hydrogen group.
    ///
    /// The location of a mobile hydrogen is not fixed, so quantities that
    /// count hydrogens on this atom are undefined.
    pub mobile_hydrogen: bool,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            hydrogen_count: Some(0),
            mobile_hydrogen: false,
        }
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.hydrogen_count = Some(count);
        self
    }

    pub fn with_unknown_hydrogens(mut self) -> Self {
        self.hydrogen_count = None;
        self
    }

    pub fn with_mobile_hydrogen(mut self) -> Self {
        self.mobile_hydrogen = true;
        self
    }
}

impl Default for Atom {
    fn default() -> Self {
        Self::new(Element::C)
    }
}
