use crate::inchi::cursor::Cursor;
use crate::inchi::error::{Layer, ParseError};

/// Hydrogen assignment read from an `/h` layer, indexed by 0-based atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrogenLayer {
    /// Fixed hydrogens on each atom.
    pub fixed: Vec<u8>,
    /// Atoms taking part in a mobile-hydrogen group.
    pub mobile: Vec<bool>,
}

impl HydrogenLayer {
    pub fn empty(atom_count: usize) -> Self {
        Self {
            fixed: vec![0; atom_count],
            mobile: vec![false; atom_count],
        }
    }
}

/// Parses a hydrogen layer (without its `h` prefix).
///
/// Atom lists made of numbers and ranges are followed by `H` and an optional
/// count, e.g. `1,3-4H2,2H`. A parenthesised group such as `(H2,1,5)` marks
/// its atoms as sharing mobile hydrogens; those hydrogens are not assigned to
/// any one atom.
pub fn parse_hydrogens(layer: &str, atom_count: usize) -> Result<HydrogenLayer, ParseError> {
    let mut cursor = Cursor::new(layer.trim(), Layer::Hydrogen);
    let mut result = HydrogenLayer::empty(atom_count);
    let mut pending: Vec<usize> = Vec::new();

    while let Some(ch) = cursor.peek() {
        match ch {
            '0'..='9' => {
                let start = cursor.atom_number(atom_count)?;
                if cursor.eat('-') {
                    let end = cursor.atom_number(atom_count)?;
                    if end < start {
                        return Err(ParseError::InvalidRange {
                            layer: Layer::Hydrogen,
                            start,
                            end,
                        });
                    }
                    pending.extend(start..=end);
                } else {
                    pending.push(start);
                }
            }
            'H' => {
                cursor.bump();
                if pending.is_empty() {
                    return Err(ParseError::UnexpectedChar {
                        layer: Layer::Hydrogen,
                        pos: cursor.pos() - 1,
                        ch,
                    });
                }
                let count = cursor.number()?.unwrap_or(1);
                let count = u8::try_from(count).map_err(|_| ParseError::InvalidCount {
                    text: count.to_string(),
                })?;
                for atom in pending.drain(..) {
                    result.fixed[atom - 1] = count;
                }
            }
            ',' => {
                cursor.bump();
            }
            '(' => mobile_group(&mut cursor, atom_count, &mut result)?,
            _ => return Err(cursor.unexpected()),
        }
    }

    if !pending.is_empty() {
        return Err(ParseError::UnexpectedEnd {
            layer: Layer::Hydrogen,
        });
    }
    Ok(result)
}

fn mobile_group(
    cursor: &mut Cursor,
    atom_count: usize,
    result: &mut HydrogenLayer,
) -> Result<(), ParseError> {
    let open = cursor.pos();
    cursor.bump();
    if !cursor.eat('H') {
        return Err(cursor.unexpected());
    }
    cursor.number()?;
    // Charged groups carry a sign after the hydrogen count, e.g. `(H-,1,2)`.
    if cursor.eat('-') || cursor.eat('+') {
        cursor.number()?;
    }
    let mut members = 0;
    loop {
        match cursor.peek() {
            Some(',') => {
                cursor.bump();
                let atom = cursor.atom_number(atom_count)?;
                result.mobile[atom - 1] = true;
                members += 1;
            }
            Some(')') if members > 0 => {
                cursor.bump();
                return Ok(());
            }
            None => {
                return Err(ParseError::UnmatchedParen {
                    layer: Layer::Hydrogen,
                    pos: open,
                })
            }
            Some(_) => return Err(cursor.unexpected()),
        }
    }
}
