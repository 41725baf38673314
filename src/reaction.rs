use std::fmt;

use crate::element::Element;
use crate::inchi::ParseError;
use crate::matcher::{MatchConfig, Matcher, PreconditionError};
use crate::metric::{Metric, Tally};
use crate::molecule::{canonical_sequence, MoleculeGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
    Equilibrium,
    Undirected,
}

impl Direction {
    /// Reads the direction character of a reaction identifier: `+`, `-`,
    /// `=`, or nothing.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Direction::Forward),
            "-" => Some(Direction::Backward),
            "=" => Some(Direction::Equilibrium),
            "" => Some(Direction::Undirected),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Direction::Forward => "+",
            Direction::Backward => "-",
            Direction::Equilibrium => "=",
            Direction::Undirected => "",
        }
    }

    /// Equilibria and undirected reactions report changes as magnitudes.
    pub fn is_symmetric(self) -> bool {
        matches!(self, Direction::Equilibrium | Direction::Undirected)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Net change in ring structure across a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingChange {
    /// Change in the total number of basis rings.
    pub rings: i64,
    /// Change in the number of molecules with at least one ring.
    pub cyclic_molecules: i64,
}

/// A reaction as three lists of single-component molecules.
#[derive(Debug, Clone, Default)]
pub struct Reaction {
    pub reactants: Vec<MoleculeGraph>,
    pub products: Vec<MoleculeGraph>,
    pub agents: Vec<MoleculeGraph>,
    pub direction: Direction,
}

impl Reaction {
    /// Builds a reaction from InChIs. Composite InChIs contribute one
    /// molecule per component.
    pub fn from_inchis(
        reactants: &[&str],
        products: &[&str],
        agents: &[&str],
        direction: Direction,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            reactants: molecules(reactants)?,
            products: molecules(products)?,
            agents: molecules(agents)?,
            direction,
        })
    }

    /// Product total minus reactant total for `metric`. Keys with no net
    /// change are left out.
    pub fn change_across(&self, metric: Metric) -> Tally {
        let mut change = Tally::new();
        for mol in &self.products {
            for (key, n) in metric.tally(mol) {
                *change.entry(key).or_insert(0) += n;
            }
        }
        for mol in &self.reactants {
            for (key, n) in metric.tally(mol) {
                *change.entry(key).or_insert(0) -= n;
            }
        }
        change.retain(|_, n| *n != 0);
        if self.direction.is_symmetric() {
            for n in change.values_mut() {
                *n = n.abs();
            }
        }
        change
    }

    pub fn ring_change(&self) -> RingChange {
        let side = |mols: &[MoleculeGraph]| {
            let rings: usize = mols.iter().map(|m| m.cycle_basis().len()).sum();
            let cyclic = mols.iter().filter(|m| !m.cycle_basis().is_empty()).count();
            (rings as i64, cyclic as i64)
        };
        let (r_rings, r_cyclic) = side(&self.reactants);
        let (p_rings, p_cyclic) = side(&self.products);
        let mut change = RingChange {
            rings: p_rings - r_rings,
            cyclic_molecules: p_cyclic - r_cyclic,
        };
        if self.direction.is_symmetric() {
            change.rings = change.rings.abs();
            change.cyclic_molecules = change.cyclic_molecules.abs();
        }
        change
    }

    /// Whether the element formula is unchanged by the reaction.
    pub fn is_balanced(&self) -> bool {
        self.change_across(Metric::Formula).is_empty()
    }

    /// Whether a reactant or product contains a ring with this element
    /// sequence, read in either direction from any starting atom.
    pub fn has_ring(&self, sequence: &[Element]) -> bool {
        let symbols: Vec<&str> = sequence.iter().map(|e| e.symbol()).collect();
        let wanted = canonical_sequence(&symbols);
        self.reactants
            .iter()
            .chain(&self.products)
            .any(|m| m.ring_histogram_by_sequence().contains_key(&wanted))
    }

    /// Whether every component of `inchi` is among the agents.
    ///
    /// Components are compared by formula and by a full matching of their
    /// heavy-atom graphs, so the InChI need not be written the same way as
    /// the one the reaction was built from.
    pub fn is_agent(&self, inchi: &str) -> Result<bool, ParseError> {
        let wanted = MoleculeGraph::from_inchi(inchi)?;
        Ok(!wanted.is_empty()
            && wanted
                .iter()
                .all(|w| self.agents.iter().any(|a| same_molecule(w, a))))
    }

    /// Whether any reactant or product was read from an InChI with an
    /// isotopic layer.
    pub fn has_isotopic_inchi(&self) -> bool {
        self.reactants
            .iter()
            .chain(&self.products)
            .any(MoleculeGraph::has_isotopic_layer)
    }

    /// Whether the reaction shows every expected change.
    ///
    /// Each `(metric, tally)` pair must be a subset of
    /// [`change_across`](Self::change_across) for that metric: every key of
    /// `tally` must be present with the same net change. Keys left out of
    /// `tally` are unconstrained. `ring_present` additionally requires a ring
    /// with that element sequence, and `isotopic` requires an isotopic InChI
    /// among the reactants or products.
    pub fn detect(
        &self,
        expected: &[(Metric, Tally)],
        ring_present: Option<&[Element]>,
        isotopic: bool,
    ) -> bool {
        for (metric, tally) in expected {
            if tally.is_empty() {
                continue;
            }
            let change = self.change_across(*metric);
            if !tally.iter().all(|(key, n)| change.get(key) == Some(n)) {
                return false;
            }
        }
        if let Some(sequence) = ring_present {
            if !self.has_ring(sequence) {
                return false;
            }
        }
        !isotopic || self.has_isotopic_inchi()
    }

    /// Checks each pattern of `query` against its side of the reaction.
    pub fn has_substructures(&self, query: &SubstructureQuery) -> Result<bool, PreconditionError> {
        if query.reactants.is_empty() && query.products.is_empty() && query.agents.is_empty() {
            return Err(PreconditionError::EmptyQuery);
        }
        if !query.found_in(&query.reactants, &self.reactants)? {
            return Ok(false);
        }
        if query.reactant_disappears
            && !query.reactants.is_empty()
            && query.found_in(&query.reactants, &self.products)?
        {
            return Ok(false);
        }
        if !query.found_in(&query.products, &self.products)? {
            return Ok(false);
        }
        if query.product_appears
            && !query.products.is_empty()
            && query.found_in(&query.products, &self.reactants)?
        {
            return Ok(false);
        }
        query.found_in(&query.agents, &self.agents)
    }
}

fn molecules(inchis: &[&str]) -> Result<Vec<MoleculeGraph>, ParseError> {
    let mut out = Vec::new();
    for inchi in inchis {
        out.extend(MoleculeGraph::from_inchi(inchi)?);
    }
    Ok(out)
}

fn same_molecule(a: &MoleculeGraph, b: &MoleculeGraph) -> bool {
    if a.atom_count() != b.atom_count()
        || a.bond_count() != b.bond_count()
        || a.formula() != b.formula()
    {
        return false;
    }
    if a.atom_count() == 0 {
        return true;
    }
    Matcher::new(a, b).map(|m| m.is_sub()).unwrap_or(false)
}

/// Substructure patterns to look for on each side of a reaction.
///
/// A pattern may have several disconnected components; they are matched
/// together against a single molecule.
#[derive(Debug, Clone)]
pub struct SubstructureQuery {
    pub reactants: Vec<Vec<MoleculeGraph>>,
    pub products: Vec<Vec<MoleculeGraph>>,
    pub agents: Vec<Vec<MoleculeGraph>>,
    /// A molecule can satisfy at most one pattern.
    pub exclusive: bool,
    /// Reject reactions whose products still contain the reactant patterns.
    pub reactant_disappears: bool,
    /// Reject reactions whose reactants already contain the product patterns.
    pub product_appears: bool,
    pub config: MatchConfig,
}

impl Default for SubstructureQuery {
    fn default() -> Self {
        Self {
            reactants: Vec::new(),
            products: Vec::new(),
            agents: Vec::new(),
            exclusive: true,
            reactant_disappears: false,
            product_appears: true,
            config: MatchConfig::default(),
        }
    }
}

impl SubstructureQuery {
    pub fn from_inchis(
        reactants: &[&str],
        products: &[&str],
        agents: &[&str],
    ) -> Result<Self, ParseError> {
        let patterns = |inchis: &[&str]| -> Result<Vec<Vec<MoleculeGraph>>, ParseError> {
            inchis.iter().map(|i| MoleculeGraph::from_inchi(i)).collect()
        };
        Ok(Self {
            reactants: patterns(reactants)?,
            products: patterns(products)?,
            agents: patterns(agents)?,
            ..Self::default()
        })
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn reactant_disappears(mut self, yes: bool) -> Self {
        self.reactant_disappears = yes;
        self
    }

    pub fn product_appears(mut self, yes: bool) -> Self {
        self.product_appears = yes;
        self
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    // Every pattern must occur in some molecule of `layer`. In exclusive mode
    // a molecule that satisfied one pattern is not offered to the next.
    fn found_in(
        &self,
        patterns: &[Vec<MoleculeGraph>],
        layer: &[MoleculeGraph],
    ) -> Result<bool, PreconditionError> {
        let mut claimed = vec![false; layer.len()];
        for pattern in patterns {
            let fragments: Vec<&MoleculeGraph> = pattern.iter().collect();
            let mut found = false;
            for (i, mol) in layer.iter().enumerate() {
                if self.exclusive && claimed[i] {
                    continue;
                }
                let matcher = Matcher::with_fragments(&fragments, mol)?.with_config(self.config);
                if matcher.is_sub() {
                    claimed[i] = true;
                    found = true;
                    break;
                }
            }
            if !found {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
