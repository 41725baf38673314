//! Per-molecule histograms that can be summed and compared across a reaction.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::hybridization::Hybridization;
use crate::inchi::{StereoFilter, StereoKind};
use crate::molecule::{MoleculeGraph, RingComposition};

/// The fixed set of molecular quantities a reaction can be compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    RingSizes,
    RingElements,
    Hybridization,
    Valence,
    Formula,
    Stereocentres,
}

/// Histogram key; one variant per metric domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKey {
    RingSize(usize),
    RingComposition(RingComposition),
    Hybridization(Option<Hybridization>),
    Valence(usize),
    Element(Element),
    Stereo(StereoKind),
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKey::RingSize(size) => write!(f, "{}", size),
            MetricKey::RingComposition(comp) => write!(f, "{}", comp),
            MetricKey::Hybridization(Some(h)) => write!(f, "{}", h),
            MetricKey::Hybridization(None) => f.write_str("none"),
            MetricKey::Valence(v) => write!(f, "{}", v),
            MetricKey::Element(e) => write!(f, "{}", e),
            MetricKey::Stereo(StereoKind::Sp2) => f.write_str("sp2"),
            MetricKey::Stereo(StereoKind::Sp3) => f.write_str("sp3"),
        }
    }
}

/// Signed counts per key. Differences between tallies may be negative.
pub type Tally = BTreeMap<MetricKey, i64>;

type TallyFn = fn(&MoleculeGraph) -> Tally;

// Indexed by `Metric as usize`; keep in the order of `Metric::ALL`.
static DISPATCH: [TallyFn; 6] = [
    ring_sizes,
    ring_elements,
    hybridization,
    valence,
    formula,
    stereocentres,
];

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::RingSizes,
        Metric::RingElements,
        Metric::Hybridization,
        Metric::Valence,
        Metric::Formula,
        Metric::Stereocentres,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::RingSizes => "ring-sizes",
            Metric::RingElements => "ring-elements",
            Metric::Hybridization => "hybridization",
            Metric::Valence => "valence",
            Metric::Formula => "formula",
            Metric::Stereocentres => "stereocentres",
        }
    }

    pub fn tally(self, mol: &MoleculeGraph) -> Tally {
        DISPATCH[self as usize](mol)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric '{}'", self.0)
    }
}

impl std::error::Error for UnknownMetric {}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

fn collect<K>(counts: BTreeMap<K, usize>, key: impl Fn(K) -> MetricKey) -> Tally {
    counts
        .into_iter()
        .map(|(k, n)| (key(k), n as i64))
        .collect()
}

fn ring_sizes(mol: &MoleculeGraph) -> Tally {
    collect(mol.ring_histogram(), MetricKey::RingSize)
}

fn ring_elements(mol: &MoleculeGraph) -> Tally {
    collect(mol.ring_histogram_by_elements(), MetricKey::RingComposition)
}

fn hybridization(mol: &MoleculeGraph) -> Tally {
    collect(mol.hybridization_counts(), MetricKey::Hybridization)
}

fn valence(mol: &MoleculeGraph) -> Tally {
    collect(mol.valence_counts(), MetricKey::Valence)
}

fn formula(mol: &MoleculeGraph) -> Tally {
    collect(mol.formula(), MetricKey::Element)
}

fn stereocentres(mol: &MoleculeGraph) -> Tally {
    [StereoKind::Sp2, StereoKind::Sp3]
        .into_iter()
        .map(|kind| {
            let n = mol.stereocentres(StereoFilter::only(kind));
            (MetricKey::Stereo(kind), n as i64)
        })
        .filter(|&(_, n)| n != 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mol(inchi: &str) -> MoleculeGraph {
        MoleculeGraph::from_inchi(inchi).unwrap().remove(0)
    }

    #[test]
    fn names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
        assert_eq!(
            "rings".parse::<Metric>().unwrap_err(),
            UnknownMetric("rings".to_string())
        );
    }

    #[test]
    fn dispatch_follows_metric_order() {
        let benzene = mol("InChI=1S/C6H6/c1-2-4-6-5-3-1/h1-6H");
        assert_eq!(
            Metric::RingSizes.tally(&benzene),
            Tally::from([(MetricKey::RingSize(6), 1)])
        );
        assert_eq!(
            Metric::Hybridization.tally(&benzene),
            Tally::from([(MetricKey::Hybridization(Some(Hybridization::SP2)), 6)])
        );
        assert_eq!(
            Metric::Valence.tally(&benzene),
            Tally::from([(MetricKey::Valence(2), 6)])
        );
        assert_eq!(
            Metric::Formula.tally(&benzene),
            Tally::from([
                (MetricKey::Element(Element::C), 6),
                (MetricKey::Element(Element::H), 6)
            ])
        );
        assert!(Metric::Stereocentres.tally(&benzene).is_empty());
    }

    #[test]
    fn ring_elements_key() {
        let pyridine = mol("InChI=1S/C5H5N/c1-2-4-6-5-3-1/h1-5H");
        let tally = Metric::RingElements.tally(&pyridine);
        let (key, count) = tally.iter().next().unwrap();
        assert_eq!(key.to_string(), "C5N");
        assert_eq!(*count, 1);
    }

    #[test]
    fn stereocentres_by_kind() {
        let m = mol("InChI=1S/C4H8/c1-3-4-2/h3-4H,1-2H3/b4-3+");
        assert_eq!(
            Metric::Stereocentres.tally(&m),
            Tally::from([(MetricKey::Stereo(StereoKind::Sp2), 1)])
        );
    }
}
