pub mod atom;
pub mod bond;
pub mod element;
pub mod graph;
pub mod hybridization;
pub mod inchi;
pub mod matcher;
pub mod metric;
pub mod molecule;
pub mod reaction;
pub mod rings;
pub mod traversal;
pub mod valence;

pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use element::Element;
pub use graph::{AtomGraph, GraphError};
pub use hybridization::Hybridization;
pub use inchi::{split_components, ParseError, StereoFilter, StereoKind};
pub use matcher::{
    AtomMapping, Dedupe, MatchConfig, Matcher, PreconditionError, SearchMode, SearchOutcome,
    SearchProgress,
};
pub use metric::{Metric, MetricKey, Tally};
pub use molecule::{MoleculeGraph, RingComposition};
pub use reaction::{Direction, Reaction, RingChange, SubstructureQuery};
pub use rings::{CycleBasis, EdgeBits, Ring};
pub use traversal::DfsTree;
