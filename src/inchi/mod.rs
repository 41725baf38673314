//! Readers for the InChI layers a molecular graph is built from.
//!
//! Each reader handles one layer body (the text between slashes, without its
//! prefix letter) of a single component. Composite identifiers are first
//! broken up with [`split_components`].

mod connectivity;
mod cursor;
pub mod error;
mod formula;
mod hydrogen;
mod layers;
pub mod stereo;

pub use connectivity::parse_connectivity;
pub use error::{Layer, ParseError};
pub use formula::{heavy_atoms, parse_formula};
pub use hydrogen::{parse_hydrogens, HydrogenLayer};
pub use layers::{split_components, Layers};
pub use stereo::{StereoFilter, StereoKind, StereoLayers};
