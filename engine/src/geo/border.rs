use crate::geo::{RegionKey, Terrain};

/// An undirected edge between two regions in the map. Units move between regions
/// by crossing borders that permit their unit type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Border(RegionKey, RegionKey, Terrain);

impl Border {
    /// Create a new border between two regions.
    pub fn new(r1: RegionKey, r2: RegionKey, terrain: Terrain) -> Self {
        Border(r1, r2, terrain)
    }

    /// The terrain of the border itself, which determines which unit types may cross it.
    pub fn terrain(&self) -> Terrain {
        self.2
    }

    /// The two regions joined by this border.
    pub fn sides(&self) -> (&RegionKey, &RegionKey) {
        (&self.0, &self.1)
    }

    /// Returns true when either of the border's endpoints is `r`.
    pub fn contains<L: PartialEq<RegionKey>>(&self, r: &L) -> bool {
        r == &self.0 || r == &self.1
    }

    /// Returns true when the border connects `r1` and `r2`.
    pub fn connects<L1: PartialEq<RegionKey>, L2: PartialEq<RegionKey>>(
        &self,
        r1: &L1,
        r2: &L2,
    ) -> bool {
        self.contains(r1) && self.contains(r2)
    }

    /// If this border touches `r`, returns the region on the other side.
    pub fn dest_from<L: PartialEq<RegionKey>>(&self, r: &L) -> Option<&RegionKey> {
        if r == &self.0 {
            Some(&self.1)
        } else if r == &self.1 {
            Some(&self.0)
        } else {
            None
        }
    }
}
