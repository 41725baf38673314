use std::collections::BTreeMap;

use crate::element::{inchi_order, Element};
use crate::inchi::cursor::{Cursor, MAX_COUNT};
use crate::inchi::error::{Layer, ParseError};

/// Parses a single-component formula layer such as `C6H12O6` into element
/// counts.
///
/// A repeated element adds to the earlier count. Multi-component formulas
/// (`C2H6O.ClH`, `2CH4`) are rejected with [`ParseError::MultipleComponents`];
/// run them through [`split_components`](crate::inchi::split_components)
/// first.
pub fn parse_formula(formula: &str) -> Result<BTreeMap<Element, usize>, ParseError> {
    let formula = formula.trim();
    if formula.is_empty() {
        return Err(ParseError::MissingFormula);
    }
    if formula.contains('.') || formula.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ParseError::MultipleComponents);
    }

    let mut cursor = Cursor::new(formula, Layer::Formula);
    let mut counts: BTreeMap<Element, usize> = BTreeMap::new();
    while !cursor.at_end() {
        let element = read_element(&mut cursor)?;
        let count = cursor.number()?.unwrap_or(1);
        if count == 0 {
            return Err(ParseError::InvalidCount {
                text: format!("{}0", element),
            });
        }
        let total = counts.entry(element).or_insert(0);
        *total = total
            .checked_add(count)
            .filter(|&n| n <= MAX_COUNT)
            .ok_or_else(|| ParseError::InvalidCount {
                text: format!("{}{}", element, count),
            })?;
    }
    Ok(counts)
}

fn read_element(cursor: &mut Cursor) -> Result<Element, ParseError> {
    let first = match cursor.peek() {
        Some(c) if c.is_ascii_uppercase() => c,
        _ => return Err(cursor.unexpected()),
    };
    cursor.bump();
    let mut symbol = String::from(first);
    if let Some(c) = cursor.peek().filter(|c| c.is_ascii_lowercase()) {
        cursor.bump();
        symbol.push(c);
    }
    Element::from_symbol(&symbol).ok_or(ParseError::InvalidElement { text: symbol })
}

/// Heavy atoms in InChI numbering order: carbon first, then the other
/// elements alphabetically, each repeated by its count. Hydrogen is never a
/// heavy atom.
///
/// Fails with [`ParseError::InvalidCount`] when the heavy atoms together
/// exceed the largest count a layer may state.
pub fn heavy_atoms(counts: &BTreeMap<Element, usize>) -> Result<Vec<Element>, ParseError> {
    let mut elements: Vec<Element> = counts
        .keys()
        .copied()
        .filter(|e| !e.is_hydrogen())
        .collect();
    elements.sort_by(|&a, &b| inchi_order(a, b));

    let total = elements
        .iter()
        .try_fold(0usize, |sum, e| sum.checked_add(counts[e]))
        .filter(|&n| n <= MAX_COUNT);
    let Some(total) = total else {
        return Err(ParseError::InvalidCount {
            text: elements
                .iter()
                .map(|e| format!("{}{}", e, counts[e]))
                .collect(),
        });
    };

    let mut atoms = Vec::with_capacity(total);
    for e in elements {
        atoms.extend(std::iter::repeat(e).take(counts[&e]));
    }
    Ok(atoms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glucose_counts() {
        let counts = parse_formula("C6H12O6").unwrap();
        assert_eq!(counts[&Element::C], 6);
        assert_eq!(counts[&Element::H], 12);
        assert_eq!(counts[&Element::O], 6);
    }

    #[test]
    fn two_letter_symbols() {
        let counts = parse_formula("C2H5BrClNa").unwrap();
        assert_eq!(counts[&Element::Br], 1);
        assert_eq!(counts[&Element::Cl], 1);
        assert_eq!(counts[&Element::Na], 1);
    }

    #[test]
    fn rejects_unknown_element() {
        assert_eq!(
            parse_formula("C2Xx").unwrap_err(),
            ParseError::InvalidElement {
                text: "Xx".to_string()
            }
        );
    }

    #[test]
    fn rejects_composite_formula() {
        assert_eq!(
            parse_formula("C2H6O.ClH").unwrap_err(),
            ParseError::MultipleComponents
        );
        assert_eq!(parse_formula("2CH4").unwrap_err(), ParseError::MultipleComponents);
    }

    #[test]
    fn rejects_empty_formula() {
        assert_eq!(parse_formula("  ").unwrap_err(), ParseError::MissingFormula);
    }

    #[test]
    fn rejects_lowercase_start() {
        assert!(matches!(
            parse_formula("c6"),
            Err(ParseError::UnexpectedChar { ch: 'c', .. })
        ));
    }

    #[test]
    fn heavy_atom_numbering_order() {
        let counts = parse_formula("C2H3ClO2").unwrap();
        assert_eq!(
            heavy_atoms(&counts).unwrap(),
            vec![Element::C, Element::C, Element::Cl, Element::O, Element::O]
        );
    }

    #[test]
    fn hydrogen_only_formula_has_no_heavy_atoms() {
        let counts = parse_formula("H2").unwrap();
        assert!(heavy_atoms(&counts).unwrap().is_empty());
    }

    #[test]
    fn oversized_counts_are_rejected() {
        assert!(matches!(
            parse_formula("C99999999999999999"),
            Err(ParseError::InvalidCount { .. })
        ));
        assert!(matches!(
            parse_formula("C18446744073709551615C1"),
            Err(ParseError::InvalidCount { .. })
        ));
        assert_eq!(
            parse_formula("C40000C40000").unwrap_err(),
            ParseError::InvalidCount {
                text: "C40000".to_string()
            }
        );
        assert_eq!(parse_formula("C65535").unwrap()[&Element::C], 65535);
    }

    #[test]
    fn heavy_atom_total_is_bounded() {
        let counts = BTreeMap::from([(Element::C, 40000), (Element::O, 40000)]);
        assert!(matches!(
            heavy_atoms(&counts),
            Err(ParseError::InvalidCount { .. })
        ));
        let counts = BTreeMap::from([(Element::C, 2), (Element::H, 70000)]);
        assert_eq!(heavy_atoms(&counts).unwrap().len(), 2);
    }
}
