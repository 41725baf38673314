//! Configuration for the substructure search.
//!
//! The defaults reproduce the plain behavior: atoms must agree on element and
//! derived hybridization, mapped bonds must agree on order, and extra bonds in
//! the target between mapped atoms are allowed.
//!
//! ```
//! use molgraph::{Dedupe, MatchConfig};
//!
//! // Induced matching, ignoring bond orders, one match per target atom set.
//! let cfg = MatchConfig::default()
//!     .induced(true)
//!     .with_bond_order(false)
//!     .with_dedupe(Dedupe::TargetAtoms);
//! assert!(cfg.induced);
//! ```

/// Search configuration.
///
/// - hybridization: compare the derived hybridization of paired atoms as
///   well as their element. Atoms without a derived hybridization (unknown
///   or mobile hydrogens) are not constrained by it.
/// - bond_order: a pattern bond only matches a target bond of equal order.
/// - induced:
///     - false => monomorphism. Every pattern bond must be present in the
///       target; the target may have further bonds between mapped atoms.
///     - true  => induced subgraph. Mapped target atoms may only be bonded
///       where their pattern atoms are.
/// - dedupe: how [`Matcher::matches`](crate::Matcher::matches) collapses
///   mappings after the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    pub hybridization: bool,
    pub bond_order: bool,
    pub induced: bool,
    pub dedupe: Dedupe,
}

impl MatchConfig {
    pub fn with_hybridization(mut self, hybridization: bool) -> Self {
        self.hybridization = hybridization;
        self
    }

    pub fn with_bond_order(mut self, bond_order: bool) -> Self {
        self.bond_order = bond_order;
        self
    }

    pub fn induced(mut self, induced: bool) -> Self {
        self.induced = induced;
        self
    }

    pub fn with_dedupe(mut self, dedupe: Dedupe) -> Self {
        self.dedupe = dedupe;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            hybridization: true,
            bond_order: true,
            induced: false,
            dedupe: Dedupe::None,
        }
    }
}

/// Control how mappings are deduplicated.
///
/// - None: every mapping is reported, including those that differ only by a
///   symmetry of the pattern.
/// - TargetAtoms: mappings onto the same SET of target atoms are collapsed to
///   the first one found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dedupe {
    #[default]
    None,
    TargetAtoms,
}
