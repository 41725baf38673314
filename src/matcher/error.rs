use std::fmt;

/// Inputs a search cannot start from. A search that finds nothing is not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// The pattern has no atoms, e.g. an empty fragment list.
    EmptyPattern,
    /// A substructure query names no patterns at all.
    EmptyQuery,
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPattern => write!(f, "pattern has no atoms"),
            Self::EmptyQuery => write!(f, "substructure query has no patterns"),
        }
    }
}

impl std::error::Error for PreconditionError {}
