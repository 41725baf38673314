//! Stereo layers: `/b` (double bonds), `/t` (tetrahedral centres) and `/s`
//! (stereo type). The `/m` inversion flag only swaps absolute configurations,
//! which no count here depends on.

use crate::inchi::cursor::{parse_count, MAX_COUNT};
use crate::inchi::error::{Layer, ParseError};

/// The two kinds of stereocentre an InChI records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StereoKind {
    /// Double-bond (cis/trans) stereo from the `/b` layer.
    Sp2,
    /// Tetrahedral stereo from the `/t` layer.
    Sp3,
}

/// Value of the `/s` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StereoType {
    Absolute,
    Relative,
    Racemic,
}

impl StereoType {
    fn from_layer(layer: &str) -> Option<Self> {
        match layer.trim() {
            "1" => Some(Self::Absolute),
            "2" => Some(Self::Relative),
            "3" => Some(Self::Racemic),
            _ => None,
        }
    }
}

/// One stereocentre descriptor, e.g. `3-` or `5?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereoCentre {
    pub descriptor: String,
}

impl StereoCentre {
    /// A centre marked `u` (undefined) or `?` (omitted) is not well-defined.
    pub fn is_well_defined(&self) -> bool {
        !self.descriptor.ends_with(['u', '?'])
    }
}

/// Which stereocentres to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StereoFilter {
    /// Count only centres whose configuration is specified.
    pub well_defined_only: bool,
    /// Ignore tetrahedral centres when the structure is relative or racemic.
    pub enantiopure_only: bool,
    /// Include double-bond centres.
    pub sp2: bool,
    /// Include tetrahedral centres.
    pub sp3: bool,
}

impl StereoFilter {
    pub fn well_defined(mut self) -> Self {
        self.well_defined_only = true;
        self
    }

    pub fn enantiopure(mut self) -> Self {
        self.enantiopure_only = true;
        self
    }

    pub fn only(kind: StereoKind) -> Self {
        Self {
            sp2: kind == StereoKind::Sp2,
            sp3: kind == StereoKind::Sp3,
            ..Self::default()
        }
    }
}

impl Default for StereoFilter {
    fn default() -> Self {
        Self {
            well_defined_only: false,
            enantiopure_only: false,
            sp2: true,
            sp3: true,
        }
    }
}

/// Stereo descriptors for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StereoLayers {
    pub double_bonds: Vec<StereoCentre>,
    pub tetrahedral: Vec<StereoCentre>,
    pub stereo_type: Option<StereoType>,
}

impl StereoLayers {
    /// Builds stereo information from the bodies of the `/b`, `/t` and `/s`
    /// layers (prefix letters already removed).
    ///
    /// Every descriptor must start with an atom number and end with a parity
    /// mark (`+`, `-`, `u` or `?`).
    pub fn from_layers(
        double_bonds: Option<&str>,
        tetrahedral: Option<&str>,
        stereo_type: Option<&str>,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            double_bonds: double_bonds.map(centres).transpose()?.unwrap_or_default(),
            tetrahedral: tetrahedral.map(centres).transpose()?.unwrap_or_default(),
            stereo_type: stereo_type.and_then(StereoType::from_layer),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.double_bonds.is_empty() && self.tetrahedral.is_empty()
    }

    pub fn is_enantiopure(&self) -> bool {
        !matches!(
            self.stereo_type,
            Some(StereoType::Relative | StereoType::Racemic)
        )
    }

    pub fn count(&self, filter: StereoFilter) -> usize {
        let tally = |centres: &[StereoCentre]| {
            centres
                .iter()
                .filter(|c| !filter.well_defined_only || c.is_well_defined())
                .count()
        };
        let mut total = 0;
        if filter.sp2 {
            total += tally(&self.double_bonds);
        }
        if filter.sp3 && (!filter.enantiopure_only || self.is_enantiopure()) {
            total += tally(&self.tetrahedral);
        }
        total
    }
}

// A leading `n*` multiplier repeats the whole list, as in `2*1-,2+`.
fn centres(layer: &str) -> Result<Vec<StereoCentre>, ParseError> {
    let layer = layer.trim();
    let (repeat, body) = match layer.split_once('*') {
        Some((n, rest)) => (parse_count(n)?, rest),
        None => (1, layer),
    };

    let mut once = Vec::new();
    let mut pos = layer.len() - body.len();
    for descriptor in body.split(',') {
        if !descriptor.is_empty() {
            check_descriptor(descriptor, pos)?;
            once.push(StereoCentre {
                descriptor: descriptor.to_string(),
            });
        }
        pos += descriptor.len() + 1;
    }
    if once.len().saturating_mul(repeat) > MAX_COUNT {
        return Err(ParseError::InvalidCount {
            text: layer.to_string(),
        });
    }

    let mut all = Vec::with_capacity(once.len() * repeat);
    for _ in 0..repeat {
        all.extend(once.iter().cloned());
    }
    Ok(all)
}

fn check_descriptor(descriptor: &str, pos: usize) -> Result<(), ParseError> {
    let unexpected = |offset: usize, ch: char| ParseError::UnexpectedChar {
        layer: Layer::Stereo,
        pos: pos + offset,
        ch,
    };
    match descriptor.char_indices().next() {
        Some((_, c)) if c.is_ascii_digit() => {}
        Some((i, c)) => return Err(unexpected(i, c)),
        None => return Ok(()),
    }
    match descriptor.char_indices().last() {
        Some((_, '+' | '-' | 'u' | '?')) => Ok(()),
        Some((i, c)) => Err(unexpected(i, c)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers(b: Option<&str>, t: Option<&str>, s: Option<&str>) -> StereoLayers {
        StereoLayers::from_layers(b, t, s).unwrap()
    }

    #[test]
    fn counts_all_centres_by_default() {
        let st = layers(Some("3-2+"), Some("4-,5+,6u"), Some("1"));
        assert_eq!(st.count(StereoFilter::default()), 4);
    }

    #[test]
    fn well_defined_skips_undefined_and_omitted() {
        let st = layers(Some("3-2?"), Some("4-,5+,6u"), None);
        assert_eq!(st.count(StereoFilter::default().well_defined()), 2);
    }

    #[test]
    fn enantiopure_ignores_racemic_sp3() {
        let st = layers(Some("3-2+"), Some("4-,5+"), Some("3"));
        assert!(!st.is_enantiopure());
        assert_eq!(st.count(StereoFilter::default().enantiopure()), 1);
        assert_eq!(st.count(StereoFilter::default()), 3);
    }

    #[test]
    fn kind_selection() {
        let st = layers(Some("3-2+"), Some("4-,5+"), None);
        assert_eq!(st.count(StereoFilter::only(StereoKind::Sp2)), 1);
        assert_eq!(st.count(StereoFilter::only(StereoKind::Sp3)), 2);
    }

    #[test]
    fn multiplier_repeats_centres() {
        let st = layers(None, Some("2*2-"), None);
        assert_eq!(st.tetrahedral.len(), 2);
    }

    #[test]
    fn stereo_type_values() {
        let st = layers(None, Some("2-"), Some("1"));
        assert_eq!(st.stereo_type, Some(StereoType::Absolute));
        assert!(st.is_enantiopure());
        assert_eq!(layers(None, None, Some("2")).stereo_type, Some(StereoType::Relative));
    }

    #[test]
    fn malformed_descriptor_is_rejected() {
        assert_eq!(
            StereoLayers::from_layers(None, Some("2-,x3+"), None).unwrap_err(),
            ParseError::UnexpectedChar {
                layer: Layer::Stereo,
                pos: 3,
                ch: 'x'
            }
        );
        assert_eq!(
            StereoLayers::from_layers(Some("3-2"), None, None).unwrap_err(),
            ParseError::UnexpectedChar {
                layer: Layer::Stereo,
                pos: 2,
                ch: '2'
            }
        );
    }

    #[test]
    fn oversized_multiplier_is_rejected() {
        assert!(matches!(
            StereoLayers::from_layers(None, Some("99999999999*2-"), None),
            Err(ParseError::InvalidCount { .. })
        ));
        assert!(matches!(
            StereoLayers::from_layers(None, Some("40000*2-,3+"), None),
            Err(ParseError::InvalidCount { .. })
        ));
    }

    #[test]
    fn no_layers_is_empty() {
        let st = StereoLayers::default();
        assert!(st.is_empty());
        assert_eq!(st.count(StereoFilter::default()), 0);
    }
}
