use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::element::{inchi_order, Element};
use crate::graph::{AtomGraph, GraphError};
use crate::hybridization::{assign_hybridization, Hybridization};
use crate::inchi::{
    heavy_atoms, parse_connectivity, parse_formula, parse_hydrogens, split_components, Layers,
    ParseError, StereoFilter, StereoLayers,
};
use crate::rings::{cyclomatic_number, CycleBasis};
use crate::traversal::{self, DfsTree};
use crate::valence;

/// Element multiset of one ring, e.g. `C5N` for a pyridine ring.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RingComposition(BTreeMap<Element, usize>);

impl RingComposition {
    pub fn count(&self, element: Element) -> usize {
        self.0.get(&element).copied().unwrap_or(0)
    }

    pub fn size(&self) -> usize {
        self.0.values().sum()
    }
}

impl FromIterator<Element> for RingComposition {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for element in iter {
            *counts.entry(element).or_insert(0) += 1;
        }
        Self(counts)
    }
}

impl fmt::Display for RingComposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut elements: Vec<Element> = self.0.keys().copied().collect();
        elements.sort_by(|&a, &b| inchi_order(a, b));
        for element in elements {
            match self.0[&element] {
                1 => write!(f, "{}", element)?,
                n => write!(f, "{}{}", element, n)?,
            }
        }
        Ok(())
    }
}

// Where the hydrogens of heavy atoms come from. An InChI without an `/h`
// layer has no hydrogens on heavy atoms; a bare connectivity string says
// nothing about them.
#[derive(Clone, Copy)]
enum Hydrogens<'a> {
    Layer(&'a str),
    Absent,
    Unknown,
}

/// A connected molecular graph with lazily derived ring and atom properties.
///
/// A `MoleculeGraph` never changes after construction. The cycle basis and
/// per-atom hybridization are computed on first use and cached, so a graph
/// can serve as the target of many matcher queries without recomputation.
#[derive(Clone)]
pub struct MoleculeGraph {
    graph: AtomGraph,
    formula: BTreeMap<Element, usize>,
    stereo: StereoLayers,
    isotopic: bool,
    cycle_basis: OnceLock<CycleBasis>,
    hybridization: OnceLock<Vec<Option<Hybridization>>>,
}

impl MoleculeGraph {
    /// Builds a molecule from the body of a connectivity layer (without its
    /// `c` prefix, empty when the layer is absent) and a single-component
    /// formula.
    ///
    /// Heavy atoms are numbered in InChI order, carbon first and the other
    /// elements alphabetically. A formula with no heavy atoms yields a single
    /// hydrogen atom. Two heavy atoms without a connectivity layer are bonded
    /// to each other.
    ///
    /// Without a hydrogen layer the hydrogens of each heavy atom are unknown,
    /// so its total valence and hybridization are `None`. Use
    /// [`build_with_hydrogens`](Self::build_with_hydrogens) to supply one.
    ///
    /// # Examples
    ///
    /// ```
    /// use molgraph::MoleculeGraph;
    ///
    /// let benzene = MoleculeGraph::build("1-2-4-6-5-3-1", "C6H6").unwrap();
    /// assert_eq!(benzene.ring_histogram().get(&6), Some(&1));
    /// ```
    pub fn build(connectivity: &str, formula: &str) -> Result<Self, ParseError> {
        let connectivity = Some(connectivity.trim()).filter(|c| !c.is_empty());
        Self::assemble(formula, connectivity, Hydrogens::Unknown, StereoLayers::default())
    }

    /// Like [`build`](Self::build), with the body of a hydrogen layer
    /// (without its `h` prefix).
    ///
    /// ```
    /// use molgraph::{Hybridization, MoleculeGraph};
    ///
    /// let ethane = MoleculeGraph::build_with_hydrogens("1-2", "C2H6", "1-2H3").unwrap();
    /// let first = petgraph::graph::NodeIndex::new(0);
    /// assert_eq!(ethane.hybridization(first), Some(Hybridization::SP3));
    /// ```
    pub fn build_with_hydrogens(
        connectivity: &str,
        formula: &str,
        hydrogens: &str,
    ) -> Result<Self, ParseError> {
        let connectivity = Some(connectivity.trim()).filter(|c| !c.is_empty());
        Self::assemble(
            formula,
            connectivity,
            Hydrogens::Layer(hydrogens.trim()),
            StereoLayers::default(),
        )
    }

    /// Builds one molecule per component of an InChI, applying its hydrogen
    /// and stereo layers.
    pub fn from_inchi(inchi: &str) -> Result<Vec<Self>, ParseError> {
        split_components(inchi)?
            .iter()
            .map(|component| Self::from_component(component))
            .collect()
    }

    fn from_component(inchi: &str) -> Result<Self, ParseError> {
        let layers = Layers::parse(inchi)?;
        let stereo =
            StereoLayers::from_layers(layers.double_bonds, layers.tetrahedral, layers.stereo_type)?;
        let hydrogens = match layers.hydrogens {
            Some(layer) => Hydrogens::Layer(layer),
            None => Hydrogens::Absent,
        };
        let mut mol = Self::assemble(layers.formula, layers.connectivity, hydrogens, stereo)?;
        mol.isotopic = layers.isotopic.is_some();
        Ok(mol)
    }

    fn assemble(
        formula: &str,
        connectivity: Option<&str>,
        hydrogens: Hydrogens<'_>,
        stereo: StereoLayers,
    ) -> Result<Self, ParseError> {
        let counts = parse_formula(formula)?;
        let heavy = heavy_atoms(&counts)?;

        let mut graph = AtomGraph::with_capacity(heavy.len().max(1), heavy.len());
        if heavy.is_empty() {
            let total = counts.get(&Element::H).copied().unwrap_or(1);
            let attached = u8::try_from(total.saturating_sub(1)).map_err(|_| {
                ParseError::InvalidCount {
                    text: total.to_string(),
                }
            })?;
            graph.add_atom(Atom::new(Element::H).with_hydrogens(attached));
        } else {
            let n = heavy.len();
            let h_layer = match hydrogens {
                Hydrogens::Layer(layer) => Some(parse_hydrogens(layer, n)?),
                Hydrogens::Absent | Hydrogens::Unknown => None,
            };
            for (i, &element) in heavy.iter().enumerate() {
                let mut atom = Atom::new(element);
                if let Some(h) = &h_layer {
                    atom.hydrogen_count = Some(h.fixed[i]);
                    atom.mobile_hydrogen = h.mobile[i];
                } else if matches!(hydrogens, Hydrogens::Unknown) {
                    atom = atom.with_unknown_hydrogens();
                }
                graph.add_atom(atom);
            }

            let pairs = match connectivity {
                Some(layer) => parse_connectivity(layer, n)?,
                None if n == 2 => vec![(1, 2)],
                None => vec![],
            };
            for (a, b) in pairs {
                graph.add_bond(NodeIndex::new(a - 1), NodeIndex::new(b - 1), Bond::single())?;
            }
        }

        let mol = Self::with_parts(graph, counts, stereo)?;
        tracing::debug!(
            formula,
            atoms = mol.atom_count(),
            bonds = mol.bond_count(),
            "built molecule graph"
        );
        Ok(mol)
    }

    /// Wraps a programmatically built graph, which must be non-empty and
    /// connected.
    pub fn from_graph(graph: AtomGraph) -> Result<Self, GraphError> {
        let mut formula = BTreeMap::new();
        for idx in graph.atoms() {
            let atom = graph.atom(idx);
            *formula.entry(atom.element).or_insert(0) += 1;
            if let Some(h) = atom.hydrogen_count.filter(|&h| h > 0) {
                *formula.entry(Element::H).or_insert(0) += h as usize;
            }
        }
        Self::with_parts(graph, formula, StereoLayers::default())
    }

    fn with_parts(
        graph: AtomGraph,
        formula: BTreeMap<Element, usize>,
        stereo: StereoLayers,
    ) -> Result<Self, GraphError> {
        if graph.is_empty() {
            return Err(GraphError::Empty);
        }
        let components = graph.components().len();
        if components > 1 {
            return Err(GraphError::Disconnected { components });
        }
        Ok(Self {
            graph,
            formula,
            stereo,
            isotopic: false,
            cycle_basis: OnceLock::new(),
            hybridization: OnceLock::new(),
        })
    }

    pub fn graph(&self) -> &AtomGraph {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &Atom {
        self.graph.atom(idx)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.atom_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.bond_count()
    }

    /// Whether the source InChI carried an isotopic layer (`/i`).
    pub fn has_isotopic_layer(&self) -> bool {
        self.isotopic
    }

    pub fn stereo(&self) -> &StereoLayers {
        &self.stereo
    }

    /// |E| − |V| + 1, the number of independent rings.
    pub fn cyclomatic_number(&self) -> usize {
        cyclomatic_number(&self.graph)
    }

    pub fn shortest_path(&self, from: NodeIndex, to: NodeIndex) -> Option<Vec<NodeIndex>> {
        traversal::shortest_path(&self.graph, from, to)
    }

    pub fn depth_first_search(&self, start: NodeIndex) -> DfsTree {
        traversal::depth_first_search(&self.graph, start)
    }

    pub fn cycle_basis(&self) -> &CycleBasis {
        self.cycle_basis
            .get_or_init(|| CycleBasis::compute(&self.graph))
    }

    /// Number of basis rings of each size.
    pub fn ring_histogram(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for ring in self.cycle_basis().rings() {
            *counts.entry(ring.len()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of basis rings of each element composition.
    pub fn ring_histogram_by_elements(&self) -> BTreeMap<RingComposition, usize> {
        let mut counts = BTreeMap::new();
        for ring in self.cycle_basis().rings() {
            let key: RingComposition = ring
                .atoms()
                .iter()
                .map(|&idx| self.atom(idx).element)
                .collect();
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    /// Number of basis rings of each element sequence. The sequence is read
    /// around the ring and reported as its least rotation or reflection, so
    /// `CCCCCN` names every pyridine ring.
    pub fn ring_histogram_by_sequence(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for ring in self.cycle_basis().rings() {
            let symbols: Vec<&str> = ring
                .atoms()
                .iter()
                .map(|&idx| self.atom(idx).element.symbol())
                .collect();
            *counts.entry(canonical_sequence(&symbols)).or_insert(0) += 1;
        }
        counts
    }

    pub fn valence(&self, atom: NodeIndex) -> usize {
        valence::valence(&self.graph, atom)
    }

    pub fn total_valence(&self, atom: NodeIndex) -> Option<usize> {
        valence::total_valence(&self.graph, atom)
    }

    pub fn hybridizations(&self) -> &[Option<Hybridization>] {
        self.hybridization
            .get_or_init(|| assign_hybridization(&self.graph, self.cycle_basis()))
    }

    pub fn hybridization(&self, atom: NodeIndex) -> Option<Hybridization> {
        self.hybridizations().get(atom.index()).copied().flatten()
    }

    pub fn hybridization_counts(&self) -> BTreeMap<Option<Hybridization>, usize> {
        let mut counts = BTreeMap::new();
        for &h in self.hybridizations() {
            *counts.entry(h).or_insert(0) += 1;
        }
        counts
    }

    pub fn valence_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for idx in self.graph.atoms() {
            *counts.entry(self.valence(idx)).or_insert(0) += 1;
        }
        counts
    }

    pub fn total_valence_counts(&self) -> BTreeMap<Option<usize>, usize> {
        let mut counts = BTreeMap::new();
        for idx in self.graph.atoms() {
            *counts.entry(self.total_valence(idx)).or_insert(0) += 1;
        }
        counts
    }

    /// Element counts, hydrogen included.
    pub fn formula(&self) -> BTreeMap<Element, usize> {
        self.formula.clone()
    }

    pub fn stereocentres(&self, filter: StereoFilter) -> usize {
        self.stereo.count(filter)
    }
}

impl fmt::Debug for MoleculeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoleculeGraph")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .field("formula", &self.formula)
            .finish()
    }
}

pub(crate) fn canonical_sequence(symbols: &[&str]) -> String {
    let len = symbols.len();
    let mut best: Option<String> = None;
    for reflect in [false, true] {
        for start in 0..len {
            let candidate: String = (0..len)
                .map(|i| {
                    let pos = if reflect {
                        (start + len - i) % len
                    } else {
                        (start + i) % len
                    };
                    symbols[pos]
                })
                .collect();
            if best.as_ref().map_or(true, |b| candidate < *b) {
                best = Some(candidate);
            }
        }
    }
    best.unwrap_or_default()
}
