use crate::inchi::cursor::{parse_count, MAX_COUNT};
use crate::inchi::error::ParseError;

const HEADER_PREFIX: &str = "InChI=";

/// The slash-separated layers of one InChI string.
///
/// Layer bodies are stored without their prefix letter. Reading stops at the
/// isotopic layer `/i` (kept in `isotopic`), the fixed-hydrogen layer `/f` or
/// the reconnected layer `/r`, because the sublayers after them reuse the
/// main prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layers<'a> {
    pub header: &'a str,
    pub formula: &'a str,
    pub connectivity: Option<&'a str>,
    pub hydrogens: Option<&'a str>,
    pub charge: Option<&'a str>,
    pub protons: Option<&'a str>,
    pub double_bonds: Option<&'a str>,
    pub tetrahedral: Option<&'a str>,
    pub inverted: Option<&'a str>,
    pub stereo_type: Option<&'a str>,
    pub isotopic: Option<&'a str>,
}

impl<'a> Layers<'a> {
    pub fn parse(inchi: &'a str) -> Result<Self, ParseError> {
        let inchi = inchi.trim();
        if inchi.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let mut parts = inchi.split('/');
        let header = parts.next().unwrap_or_default();
        if !header.starts_with(HEADER_PREFIX) {
            return Err(ParseError::InvalidHeader {
                text: header.to_string(),
            });
        }
        let formula = parts.next().unwrap_or_default();
        if formula.is_empty() {
            return Err(ParseError::MissingFormula);
        }

        let mut layers = Layers {
            header,
            formula,
            ..Layers::default()
        };
        for part in parts {
            let Some(prefix) = part.chars().next() else {
                continue;
            };
            let body = &part[prefix.len_utf8()..];
            match prefix {
                'i' => {
                    layers.isotopic = Some(body);
                    break;
                }
                'f' | 'r' => break,
                _ => {}
            }
            let slot = match prefix {
                'c' => &mut layers.connectivity,
                'h' => &mut layers.hydrogens,
                'q' => &mut layers.charge,
                'p' => &mut layers.protons,
                'b' => &mut layers.double_bonds,
                't' => &mut layers.tetrahedral,
                'm' => &mut layers.inverted,
                's' => &mut layers.stereo_type,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(body);
            }
        }
        Ok(layers)
    }
}

/// Splits every layer of an InChI into the separate components it
/// describes, returning one InChI string per component.
///
/// The formula layer separates components with `.` and writes repeated
/// components with a leading count (`2CH4`); every other layer separates
/// them with `;` and repeats with `n*`. Missing trailing entries are simply
/// absent from the shorter components.
pub fn split_components(inchi: &str) -> Result<Vec<String>, ParseError> {
    let inchi = inchi.trim();
    if inchi.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let mut parts = inchi.split('/');
    let header = parts.next().unwrap_or_default();
    if !header.starts_with(HEADER_PREFIX) {
        return Err(ParseError::InvalidHeader {
            text: header.to_string(),
        });
    }
    let formula = parts.next().unwrap_or_default();
    if formula.is_empty() {
        return Err(ParseError::MissingFormula);
    }

    let mut columns: Vec<Vec<String>> = vec![expand_formula(formula)?];
    for part in parts {
        let Some(prefix) = part.chars().next() else {
            continue;
        };
        let body = &part[prefix.len_utf8()..];
        let entries = expand_layer(body)?
            .into_iter()
            .map(|entry| {
                if entry.is_empty() {
                    entry
                } else {
                    format!("{}{}", prefix, entry)
                }
            })
            .collect();
        columns.push(entries);
    }

    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    let mut components = Vec::with_capacity(rows);
    for row in 0..rows {
        let pieces: Vec<&str> = columns
            .iter()
            .filter_map(|col| col.get(row))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        if pieces.is_empty() {
            continue;
        }
        components.push(format!("{}/{}", header, pieces.join("/")));
    }
    tracing::debug!(inchi, components = components.len(), "split InChI into components");
    Ok(components)
}

fn expand_formula(formula: &str) -> Result<Vec<String>, ParseError> {
    let mut out = Vec::new();
    for piece in formula.split('.') {
        let digits = piece.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            out.push(piece.to_string());
            continue;
        }
        let count = parse_count(&piece[..digits])?;
        out.extend(std::iter::repeat(piece[digits..].to_string()).take(count));
        check_expanded(&out, piece)?;
    }
    Ok(out)
}

fn expand_layer(body: &str) -> Result<Vec<String>, ParseError> {
    let mut out = Vec::new();
    for piece in body.split(';') {
        match piece.split_once('*') {
            Some((count, rest)) if !count.is_empty() && count.chars().all(|c| c.is_ascii_digit()) => {
                let count = parse_count(count)?;
                out.extend(std::iter::repeat(rest.to_string()).take(count));
                check_expanded(&out, piece)?;
            }
            _ => out.push(piece.to_string()),
        }
    }
    Ok(out)
}

// The expanded component list is bounded like any other count.
fn check_expanded(out: &[String], text: &str) -> Result<(), ParseError> {
    if out.len() > MAX_COUNT {
        return Err(ParseError::InvalidCount {
            text: text.to_string(),
        });
    }
    Ok(())
}
