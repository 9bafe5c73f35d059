//! Translation from the judge's fine-grained outcome types to the coarse result
//! vocabulary reported to players and persisted in game history.

use std::collections::BTreeSet;

use crate::geo::{ProvinceKey, RegionKey};
use crate::judge::retreat::DestStatus;
use crate::judge::{
    build, retreat, AttackOutcome, ConvoyOutcome, HoldOutcome, MappedBuildOrder, MappedMainOrder,
    MappedRetreatOrder, OrderOutcome, SupportOutcome,
};
use crate::{Nation, UnitType};

/// The coarse-grained result of a single order, independent of phase or rulebook edition.
///
/// Every judge outcome type collapses onto one of these. Where the underlying outcome
/// names the order responsible (a disloger, a cutter), that order's text is carried along
/// for player-facing explanations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResultKind {
    /// The order succeeded outright.
    Ok,
    /// A move failed because another unit held the destination against it.
    Bounce,
    /// The order was illegal and was never evaluated (e.g. issued to a foreign unit,
    /// or a move to a non-adjacent region without a convoy).
    Void,
    /// A support order was cut by an attack on the supporting unit.
    Cut,
    /// The unit was dislodged and must retreat or disband.
    Dislodged,
    /// A convoy was disrupted, either by the convoying fleet being dislodged or by
    /// the Szykman rule resolving a paradox against it.
    Disrupted,
    /// A move required a convoy that was never offered or could not complete.
    NoConvoy,
}

/// The outcome of a single order, translated into the reporting vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderResult {
    pub nation: Nation,
    pub unit_type: UnitType,
    pub region: RegionKey,
    /// The rendered order text, kept for display without re-parsing.
    pub order_text: String,
    pub result: ResultKind,
    /// The order responsible for a `Bounce`, `Cut`, or `Dislodged` result, if any.
    pub caused_by: Option<String>,
}

pub(super) fn translate_main_order(
    order: &MappedMainOrder,
    outcome: &OrderOutcome<&MappedMainOrder>,
) -> OrderResult {
    let (result, caused_by) = match outcome {
        OrderOutcome::Illegal(reason) => (ResultKind::Void, Some(format!("{reason:?}"))),
        OrderOutcome::Hold(HoldOutcome::Succeeds) => (ResultKind::Ok, None),
        OrderOutcome::Hold(HoldOutcome::Dislodged(by)) => {
            (ResultKind::Dislodged, Some(by.to_string()))
        }
        OrderOutcome::Move(AttackOutcome::Succeeds) => (ResultKind::Ok, None),
        OrderOutcome::Move(AttackOutcome::Prevented(by)) => {
            (ResultKind::Bounce, Some(by.to_string()))
        }
        OrderOutcome::Move(AttackOutcome::OccupierDefended) => (ResultKind::Bounce, None),
        OrderOutcome::Move(AttackOutcome::LostHeadToHead) => (ResultKind::Dislodged, None),
        OrderOutcome::Move(AttackOutcome::NoPath) => (ResultKind::NoConvoy, None),
        OrderOutcome::Move(AttackOutcome::MoveToSelf | AttackOutcome::FriendlyFire) => {
            (ResultKind::Void, None)
        }
        OrderOutcome::Support(SupportOutcome::NotDisrupted) => (ResultKind::Ok, None),
        OrderOutcome::Support(SupportOutcome::CutBy(by)) => {
            (ResultKind::Cut, Some(by.to_string()))
        }
        OrderOutcome::Support(SupportOutcome::SupportingSelf | SupportOutcome::CantReach) => {
            (ResultKind::Void, None)
        }
        OrderOutcome::Convoy(ConvoyOutcome::NotDisrupted) => (ResultKind::Ok, None),
        OrderOutcome::Convoy(ConvoyOutcome::Dislodged(by)) => {
            (ResultKind::Disrupted, Some(by.to_string()))
        }
        OrderOutcome::Convoy(ConvoyOutcome::Paradox) => (ResultKind::Disrupted, None),
        OrderOutcome::Convoy(ConvoyOutcome::NotAtSea) => (ResultKind::Void, None),
    };

    OrderResult {
        nation: order.nation.clone(),
        unit_type: order.unit_type,
        region: order.region.clone(),
        order_text: order.to_string(),
        result,
        caused_by,
    }
}

pub(super) fn translate_retreat_order(
    order: &MappedRetreatOrder,
    outcome: &retreat::OrderOutcome<&MappedRetreatOrder>,
) -> OrderResult {
    let (result, caused_by) = match outcome {
        retreat::OrderOutcome::Moves | retreat::OrderOutcome::DisbandsAsOrdered => {
            (ResultKind::Ok, None)
        }
        retreat::OrderOutcome::Prevented(by) => (ResultKind::Bounce, Some(by.to_string())),
        retreat::OrderOutcome::InvalidDestination(status) => {
            (ResultKind::Void, Some(format!("{status:?}")))
        }
        retreat::OrderOutcome::InvalidRecipient => (ResultKind::Void, None),
    };

    OrderResult {
        nation: order.nation.clone(),
        unit_type: order.unit_type,
        region: order.region.clone(),
        order_text: order.to_string(),
        result,
        caused_by,
    }
}

pub(super) fn translate_build_order(
    order: &MappedBuildOrder,
    outcome: &build::OrderOutcome,
) -> OrderResult {
    let result = if *outcome == build::OrderOutcome::Succeeds {
        ResultKind::Ok
    } else {
        ResultKind::Void
    };

    OrderResult {
        nation: order.nation.clone(),
        unit_type: order.unit_type,
        region: order.region.clone(),
        order_text: order.to_string(),
        result,
        caused_by: if result == ResultKind::Void {
            Some(format!("{outcome:?}"))
        } else {
            None
        },
    }
}

/// A unit dislodged during the main phase, carried forward as an owned value so the
/// retreat phase can be offered to players without borrowing the movement phase's
/// adjudication state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DislodgedUnit {
    pub nation: Nation,
    pub unit_type: UnitType,
    /// The region the unit was dislodged from.
    pub region: RegionKey,
    /// The province the dislodging unit attacked from; a retreat may not re-enter it
    /// unless the dislodger itself arrived by convoy.
    pub attacker_origin: ProvinceKey,
    /// Regions the unit may retreat into. Empty means the unit has no choice but to disband.
    pub available_destinations: BTreeSet<RegionKey>,
}

impl DislodgedUnit {
    pub(super) fn from_start<'a>(
        order: &'a MappedMainOrder,
        dislodger: &'a MappedMainOrder,
        start: &retreat::Start<'a>,
    ) -> Self {
        let destinations = start
            .retreat_destinations()
            .get(&order.unit_position())
            .map(|dests| dests.available().into_iter().cloned().collect())
            .unwrap_or_default();

        DislodgedUnit {
            nation: order.nation.clone(),
            unit_type: order.unit_type,
            region: order.region.clone(),
            attacker_origin: dislodger.region.province().clone(),
            available_destinations: destinations,
        }
    }
}

/// Required so `DestStatus` values can be interpolated for display without depending
/// on its `Debug` impl directly in calling code.
pub(super) fn dest_status_label(status: DestStatus) -> &'static str {
    match status {
        DestStatus::Available => "available",
        DestStatus::Unreachable => "unreachable",
        DestStatus::BlockedByDislodger => "blocked-by-dislodger",
        DestStatus::Occupied => "occupied",
        DestStatus::Contested => "contested",
    }
}
