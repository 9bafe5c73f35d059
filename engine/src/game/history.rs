use crate::geo::RegionKey;
use crate::time::Time;
use crate::{Nation, UnitPosition};

use super::result::{DislodgedUnit, OrderResult};

/// A completed turn, kept for replay and for answering "what happened" queries
/// from reconnecting players.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseRecord {
    pub time: Time,
    pub results: Vec<OrderResult>,
    /// Units dislodged during this phase. Only populated for movement phases;
    /// by the time a retreat phase record is written these have already been
    /// resolved into `units_after`.
    pub dislodged: Vec<DislodgedUnit>,
    /// Supply center ownership changes recorded during this phase, as
    /// `(province, new owner)` pairs. Only populated for build phases.
    pub ownership_changes: Vec<(crate::geo::ProvinceKey, Nation)>,
    /// Every power that voted for a draw as this phase concluded.
    pub draw_votes: Vec<Nation>,
    pub units_after: Vec<UnitPosition<'static, RegionKey>>,
}
