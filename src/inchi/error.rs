use std::fmt;

use crate::graph::GraphError;

/// The InChI layer an error was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Formula,
    Connectivity,
    Hydrogen,
    Stereo,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Formula => "formula",
            Layer::Connectivity => "connectivity",
            Layer::Hydrogen => "hydrogen",
            Layer::Stereo => "stereo",
        };
        f.write_str(name)
    }
}

/// Errors produced when reading InChI layers into a molecular graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input string was empty or contained only whitespace.
    EmptyInput,
    /// The identifier does not start with an `InChI=` header.
    InvalidHeader { text: String },
    /// No formula layer follows the header.
    MissingFormula,
    /// An unexpected character was encountered at the given position.
    UnexpectedChar { layer: Layer, pos: usize, ch: char },
    /// A layer ended in the middle of an item.
    UnexpectedEnd { layer: Layer },
    /// A parenthesis was opened without a matching close, or vice versa.
    UnmatchedParen { layer: Layer, pos: usize },
    /// An unrecognized element symbol was found in the formula.
    InvalidElement { text: String },
    /// A numeric count overflowed or was otherwise invalid.
    InvalidCount { text: String },
    /// Atoms are numbered from 1; an index of 0 was found.
    AtomIndexZero { layer: Layer },
    /// An atom index exceeds the number of atoms the formula provides.
    AtomOutOfRange {
        layer: Layer,
        index: usize,
        atom_count: usize,
    },
    /// A range such as `5-3` runs backwards.
    InvalidRange { layer: Layer, start: usize, end: usize },
    /// The input describes several components where one was expected.
    MultipleComponents,
    /// The parsed atoms and bonds do not form a valid molecular graph.
    Graph(GraphError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty InChI string"),
            Self::InvalidHeader { text } => write!(f, "invalid InChI header '{}'", text),
            Self::MissingFormula => write!(f, "missing formula layer"),
            Self::UnexpectedChar { layer, pos, ch } => write!(
                f,
                "unexpected character '{}' at position {} of the {} layer",
                ch, pos, layer
            ),
            Self::UnexpectedEnd { layer } => write!(f, "unexpected end of the {} layer", layer),
            Self::UnmatchedParen { layer, pos } => write!(
                f,
                "unmatched parenthesis at position {} of the {} layer",
                pos, layer
            ),
            Self::InvalidElement { text } => write!(f, "invalid element '{}'", text),
            Self::InvalidCount { text } => write!(f, "invalid count '{}'", text),
            Self::AtomIndexZero { layer } => write!(f, "atom index 0 in the {} layer", layer),
            Self::AtomOutOfRange {
                layer,
                index,
                atom_count,
            } => write!(
                f,
                "atom {} in the {} layer is out of range for {} atoms",
                index, layer, atom_count
            ),
            Self::InvalidRange { layer, start, end } => {
                write!(f, "invalid range {}-{} in the {} layer", start, end, layer)
            }
            Self::MultipleComponents => {
                write!(f, "input has several components; split it first")
            }
            Self::Graph(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphError> for ParseError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}
