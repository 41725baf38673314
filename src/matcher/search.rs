use std::ops::ControlFlow;

use petgraph::graph::NodeIndex;

use super::config::MatchConfig;
use super::state::{AtomLabel, Backup, MatchGraph, MatchState};
use super::{AtomMapping, SearchMode, SearchOutcome, SearchProgress};

/// One level of the search: the pattern atom being placed, the target atoms
/// still to try for it, and the backup of the extension currently applied.
struct Frame {
    pattern_atom: usize,
    candidates: Vec<usize>,
    cursor: usize,
    backup: Option<Backup>,
}

impl Frame {
    fn open(state: &MatchState) -> Option<Self> {
        let (pattern_atom, candidates) = state.candidates()?;
        Some(Self {
            pattern_atom,
            candidates,
            cursor: 0,
            backup: None,
        })
    }
}

pub(super) struct Search<'a> {
    pattern: &'a MatchGraph,
    target: &'a MatchGraph,
    config: MatchConfig,
}

impl<'a> Search<'a> {
    pub(super) fn new(pattern: &'a MatchGraph, target: &'a MatchGraph, config: MatchConfig) -> Self {
        Self {
            pattern,
            target,
            config,
        }
    }

    pub(super) fn run<F>(&self, mode: SearchMode, mut control: F) -> SearchOutcome
    where
        F: FnMut(&SearchProgress) -> ControlFlow<()>,
    {
        tracing::debug!(
            pattern_atoms = self.pattern.len(),
            target_atoms = self.target.len(),
            ?mode,
            "starting substructure search"
        );
        let mut progress = SearchProgress::default();
        let mut found: Vec<AtomMapping> = Vec::new();

        if self.pattern.len() > self.target.len() {
            tracing::debug!("pattern larger than target");
            return SearchOutcome::Complete(found);
        }

        let mut state = MatchState::new(self.pattern.len(), self.target.len());
        let mut stack: Vec<Frame> = Frame::open(&state).into_iter().collect();

        while let Some(frame) = stack.last_mut() {
            if let Some(backup) = frame.backup.take() {
                state.restore(backup);
                progress.backtracks += 1;
                tracing::trace!(depth = state.depth(), "backtrack");
            }
            let Some(&m) = frame.candidates.get(frame.cursor) else {
                stack.pop();
                continue;
            };
            frame.cursor += 1;
            let n = frame.pattern_atom;

            progress.explored += 1;
            progress.depth = state.depth();
            if control(&progress).is_break() {
                tracing::debug!(explored = progress.explored, "search cancelled");
                return SearchOutcome::Cancelled { progress };
            }
            if !self.is_feasible(&state, n, m) {
                continue;
            }

            frame.backup = Some(state.extend(n, m, self.pattern, self.target));
            if state.is_covering() {
                let mapping = to_mapping(&state);
                tracing::trace!(?mapping, "match");
                found.push(mapping);
                progress.matches += 1;
                if mode == SearchMode::First {
                    break;
                }
                continue;
            }
            if let Some(next) = Frame::open(&state) {
                stack.push(next);
            }
        }

        tracing::debug!(
            explored = progress.explored,
            backtracks = progress.backtracks,
            matches = found.len(),
            "substructure search finished"
        );
        SearchOutcome::Complete(found)
    }

    fn is_feasible(&self, state: &MatchState, n: usize, m: usize) -> bool {
        self.labels_match(n, m)
            && self.mapped_neighbors_match(state, n, m)
            && self.look_ahead(state, n, m)
    }

    fn labels_match(&self, n: usize, m: usize) -> bool {
        let p = self.pattern.label(n);
        let t = self.target.label(m);
        p.element == t.element && (!self.config.hybridization || hybridization_agrees(&p, &t))
    }

    fn mapped_neighbors_match(&self, state: &MatchState, n: usize, m: usize) -> bool {
        for &(n_nb, p_order) in self.pattern.neighbors(n) {
            let Some(m_nb) = state.image(n_nb) else {
                continue;
            };
            match self.target.bond(m, m_nb) {
                Some(t_order) if !self.config.bond_order || t_order == p_order => {}
                _ => return false,
            }
        }
        if self.config.induced {
            for &(m_nb, _) in self.target.neighbors(m) {
                let Some(n_nb) = state.preimage(m_nb) else {
                    continue;
                };
                if self.pattern.bond(n, n_nb).is_none() {
                    return false;
                }
            }
        }
        true
    }

    // The pattern must not need more future neighbours than the target offers.
    fn look_ahead(&self, state: &MatchState, n: usize, m: usize) -> bool {
        let (mut p_term, mut p_new) = (0, 0);
        for &(nb, _) in self.pattern.neighbors(n) {
            if state.image(nb).is_some() {
                continue;
            }
            if state.in_pattern_terminal(nb) {
                p_term += 1;
            } else {
                p_new += 1;
            }
        }
        let (mut t_term, mut t_new) = (0, 0);
        for &(nb, _) in self.target.neighbors(m) {
            if state.preimage(nb).is_some() {
                continue;
            }
            if state.in_target_terminal(nb) {
                t_term += 1;
            } else {
                t_new += 1;
            }
        }

        if p_term > t_term {
            return false;
        }
        if self.config.induced {
            p_new <= t_new
        } else {
            p_term + p_new <= t_term + t_new
        }
    }
}

// An atom whose hybridization could not be derived is compatible with any.
fn hybridization_agrees(p: &AtomLabel, t: &AtomLabel) -> bool {
    match (p.hybridization, t.hybridization) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

fn to_mapping(state: &MatchState) -> AtomMapping {
    state
        .pairs()
        .into_iter()
        .map(|(p, t)| (NodeIndex::new(p), NodeIndex::new(t)))
        .collect()
}
