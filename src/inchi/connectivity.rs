use crate::inchi::cursor::Cursor;
use crate::inchi::error::{Layer, ParseError};

/// Parses a connectivity layer (without its `c` prefix) into bonds between
/// 1-based atom numbers.
///
/// `-` joins consecutive atoms of a chain; a parenthesised group opens
/// branches from the atom before it, with `,` separating sibling branches;
/// an atom written straight after `)` continues the chain from that same
/// atom. Branches nest to any depth.
///
/// ```
/// use molgraph::inchi::parse_connectivity;
///
/// let bonds = parse_connectivity("1-5(2,3)4", 5).unwrap();
/// assert_eq!(bonds, vec![(1, 5), (5, 2), (5, 3), (5, 4)]);
/// ```
pub fn parse_connectivity(layer: &str, atom_count: usize) -> Result<Vec<(usize, usize)>, ParseError> {
    let mut parser = ConnectivityParser {
        cursor: Cursor::new(layer.trim(), Layer::Connectivity),
        atom_count,
        bonds: Vec::new(),
    };
    if parser.cursor.at_end() {
        return Ok(Vec::new());
    }
    parser.chain(None)?;
    if !parser.cursor.at_end() {
        return Err(match parser.cursor.peek() {
            Some(')') => ParseError::UnmatchedParen {
                layer: Layer::Connectivity,
                pos: parser.cursor.pos(),
            },
            _ => parser.cursor.unexpected(),
        });
    }
    Ok(parser.bonds)
}

struct ConnectivityParser {
    cursor: Cursor,
    atom_count: usize,
    bonds: Vec<(usize, usize)>,
}

impl ConnectivityParser {
    fn chain(&mut self, anchor: Option<usize>) -> Result<(), ParseError> {
        let mut current = self.cursor.atom_number(self.atom_count)?;
        if let Some(anchor) = anchor {
            self.bonds.push((anchor, current));
        }
        loop {
            match self.cursor.peek() {
                Some('-') => {
                    self.cursor.bump();
                    let next = self.cursor.atom_number(self.atom_count)?;
                    self.bonds.push((current, next));
                    current = next;
                }
                Some('(') => {
                    self.branches(current)?;
                    if self.cursor.at_digit() {
                        let next = self.cursor.atom_number(self.atom_count)?;
                        self.bonds.push((current, next));
                        current = next;
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn branches(&mut self, anchor: usize) -> Result<(), ParseError> {
        let open = self.cursor.pos();
        self.cursor.bump();
        loop {
            self.chain(Some(anchor))?;
            match self.cursor.peek() {
                Some(',') => {
                    self.cursor.bump();
                }
                Some(')') => {
                    self.cursor.bump();
                    return Ok(());
                }
                None => {
                    return Err(ParseError::UnmatchedParen {
                        layer: Layer::Connectivity,
                        pos: open,
                    })
                }
                Some(_) => return Err(self.cursor.unexpected()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_chain() {
        assert_eq!(
            parse_connectivity("1-2-3", 3).unwrap(),
            vec![(1, 2), (2, 3)]
        );
    }

    #[test]
    fn benzene_ring_closure() {
        let bonds = parse_connectivity("1-2-4-6-5-3-1", 6).unwrap();
        assert_eq!(bonds.len(), 6);
        assert_eq!(bonds[5], (3, 1));
    }

    #[test]
    fn naphthalene_branch_then_continue() {
        let bonds = parse_connectivity("1-2-6-10-8-4-3-7-9(10)5-1", 10).unwrap();
        assert_eq!(bonds.len(), 11);
        assert!(bonds.contains(&(9, 10)));
        assert!(bonds.contains(&(9, 5)));
        assert!(bonds.contains(&(5, 1)));
    }

    #[test]
    fn neopentane_sibling_branches() {
        let bonds = parse_connectivity("1-5(2,3)4", 5).unwrap();
        assert_eq!(bonds, vec![(1, 5), (5, 2), (5, 3), (5, 4)]);
    }

    #[test]
    fn nested_branches() {
        let bonds = parse_connectivity("1-2(3-4(5)6)7", 7).unwrap();
        assert_eq!(
            bonds,
            vec![(1, 2), (2, 3), (3, 4), (4, 5), (4, 6), (2, 7)]
        );
    }

    #[test]
    fn branch_with_chain_inside() {
        let bonds = parse_connectivity("1-3(5-7)2-4", 7).unwrap();
        assert_eq!(bonds, vec![(1, 3), (3, 5), (5, 7), (3, 2), (2, 4)]);
    }

    #[test]
    fn empty_layer_has_no_bonds() {
        assert!(parse_connectivity("", 1).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_atom() {
        assert_eq!(
            parse_connectivity("1-2-9", 3).unwrap_err(),
            ParseError::AtomOutOfRange {
                layer: Layer::Connectivity,
                index: 9,
                atom_count: 3
            }
        );
    }

    #[test]
    fn zero_atom_index() {
        assert_eq!(
            parse_connectivity("0-1", 3).unwrap_err(),
            ParseError::AtomIndexZero {
                layer: Layer::Connectivity
            }
        );
    }

    #[test]
    fn unclosed_branch() {
        assert_eq!(
            parse_connectivity("1-2(3", 3).unwrap_err(),
            ParseError::UnmatchedParen {
                layer: Layer::Connectivity,
                pos: 3
            }
        );
    }

    #[test]
    fn stray_close_paren() {
        assert_eq!(
            parse_connectivity("1-2)3", 3).unwrap_err(),
            ParseError::UnmatchedParen {
                layer: Layer::Connectivity,
                pos: 3
            }
        );
    }

    #[test]
    fn dangling_dash() {
        assert_eq!(
            parse_connectivity("1-", 3).unwrap_err(),
            ParseError::UnexpectedEnd {
                layer: Layer::Connectivity
            }
        );
    }

    #[test]
    fn component_separator_is_rejected() {
        assert_eq!(
            parse_connectivity("1-2;3-4", 4).unwrap_err(),
            ParseError::MultipleComponents
        );
    }
}
