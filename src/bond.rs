#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub order: BondOrder,
}

impl Bond {
    pub fn new(order: BondOrder) -> Self {
        Self { order }
    }

    pub fn single() -> Self {
        Self::new(BondOrder::Single)
    }
}

impl Default for Bond {
    fn default() -> Self {
        Self {
            order: BondOrder::Single,
        }
    }
}
