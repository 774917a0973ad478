//! Named all-distinct cell groupings.

use crate::solver::cells::CellIndex;

/// How a region came to exist. The disjoint-groups builder derives its
/// cross-regions from the `Box` regions only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Row,
    Col,
    Box,
    Extra,
}

/// A named group of cells required to hold pairwise-distinct values.
///
/// `owner` is the display name of the constraint that declared the region,
/// if any; the region never owns the constraint's lifetime.
#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    pub cells: Vec<CellIndex>,
    pub kind: RegionKind,
    pub description: String,
    pub owner: Option<String>,
}
