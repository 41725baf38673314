//! VF2-style substructure search.
//!
//! A [`Matcher`] pairs a pattern with a target and answers existence,
//! first-match, and counting queries. The search keeps an explicit stack of
//! frames instead of recursing. Each frame owns the candidates left to try at
//! its depth and the [`Backup`](state::Backup) that undoes its extension, so
//! deep searches on large molecules never grow the call stack.
//!
//! ```
//! use molgraph::{Matcher, MoleculeGraph};
//!
//! let ethane = MoleculeGraph::from_inchi("InChI=1S/C2H6/c1-2/h1-2H3").unwrap();
//! let ethanol = MoleculeGraph::from_inchi("InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3").unwrap();
//! let matcher = Matcher::new(&ethane[0], &ethanol[0]).unwrap();
//! assert!(matcher.is_sub());
//! assert_eq!(matcher.sub_count_unique(), 1);
//! ```

mod config;
mod error;
mod search;
mod state;

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use petgraph::graph::NodeIndex;

use crate::molecule::MoleculeGraph;

pub use config::{Dedupe, MatchConfig};
pub use error::PreconditionError;

use search::Search;
use state::MatchGraph;

/// One embedding of the pattern: `(pattern atom, target atom)` pairs in
/// pattern atom order.
pub type AtomMapping = Vec<(NodeIndex, NodeIndex)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Stop at the first covering mapping.
    First,
    /// Enumerate every covering mapping.
    All,
}

/// Counters handed to the control callback of [`Matcher::search`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchProgress {
    /// Candidate pairs examined so far.
    pub explored: usize,
    /// Pattern atoms mapped when the current pair was examined.
    pub depth: usize,
    /// Covering mappings found so far.
    pub matches: usize,
    pub backtracks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search ran to the end (or to the first match in
    /// [`SearchMode::First`]).
    Complete(Vec<AtomMapping>),
    /// The control callback stopped the search. Mappings found before the
    /// stop are discarded.
    Cancelled { progress: SearchProgress },
}

impl SearchOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchOutcome::Cancelled { .. })
    }

    pub fn into_mappings(self) -> Option<Vec<AtomMapping>> {
        match self {
            SearchOutcome::Complete(found) => Some(found),
            SearchOutcome::Cancelled { .. } => None,
        }
    }
}

/// Substructure search of one pattern in one target.
///
/// The matcher holds flattened copies of both graphs and never touches the
/// source molecules again, so one target can be reused for any number of
/// matchers.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: MatchGraph,
    target: MatchGraph,
    config: MatchConfig,
}

impl Matcher {
    pub fn new(pattern: &MoleculeGraph, target: &MoleculeGraph) -> Result<Self, PreconditionError> {
        Self::with_fragments(&[pattern], target)
    }

    /// A pattern made of several disconnected fragments. Pattern atom `i` of
    /// fragment `k` appears in mappings as `i` plus the atom counts of
    /// fragments `0..k`.
    pub fn with_fragments(
        fragments: &[&MoleculeGraph],
        target: &MoleculeGraph,
    ) -> Result<Self, PreconditionError> {
        let pattern = MatchGraph::from_fragments(fragments);
        if pattern.is_empty() {
            return Err(PreconditionError::EmptyPattern);
        }
        Ok(Self {
            pattern,
            target: MatchGraph::from_fragments(&[target]),
            config: MatchConfig::default(),
        })
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Runs the search, calling `control` before each candidate pair is
    /// examined. Returning [`ControlFlow::Break`] cancels the search.
    pub fn search<F>(&self, mode: SearchMode, control: F) -> SearchOutcome
    where
        F: FnMut(&SearchProgress) -> ControlFlow<()>,
    {
        Search::new(&self.pattern, &self.target, self.config).run(mode, control)
    }

    fn run(&self, mode: SearchMode) -> Vec<AtomMapping> {
        self.search(mode, |_| ControlFlow::Continue(()))
            .into_mappings()
            .unwrap_or_default()
    }

    pub fn is_sub(&self) -> bool {
        self.first_match().is_some()
    }

    pub fn first_match(&self) -> Option<AtomMapping> {
        self.run(SearchMode::First).into_iter().next()
    }

    /// Number of mappings, counting each symmetry-equivalent ordering of the
    /// same target atoms separately.
    ///
    /// A two-carbon pattern lands on the C-C bond of ethanol in both
    /// orientations, so this returns 2 where
    /// [`sub_count_unique`](Self::sub_count_unique) returns 1.
    pub fn sub_count(&self) -> usize {
        self.run(SearchMode::All).len()
    }

    /// Number of distinct target atom sets covered by a mapping.
    pub fn sub_count_unique(&self) -> usize {
        self.run(SearchMode::All)
            .iter()
            .map(target_key)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Every mapping, deduplicated according to [`MatchConfig::dedupe`].
    pub fn matches(&self) -> Vec<AtomMapping> {
        let all = self.run(SearchMode::All);
        match self.config.dedupe {
            Dedupe::None => all,
            Dedupe::TargetAtoms => {
                let mut seen = BTreeSet::new();
                all.into_iter()
                    .filter(|mapping| seen.insert(target_key(mapping)))
                    .collect()
            }
        }
    }
}

fn target_key(mapping: &AtomMapping) -> Vec<NodeIndex> {
    let mut key: Vec<NodeIndex> = mapping.iter().map(|&(_, t)| t).collect();
    key.sort();
    key
}
