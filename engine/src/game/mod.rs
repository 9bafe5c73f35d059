//! The `Game` aggregate: a single Diplomacy game's state machine, from formation
//! through to victory, draw, or abandonment.
//!
//! This module owns turn sequencing and order bookkeeping; the actual rules
//! questions (can this order succeed, who gets dislodged) are delegated to
//! [`crate::judge`]. Every judge outcome type that borrows from a transient
//! adjudication is converted to an owned snapshot before it leaves this module,
//! so a `Game` can sit in a session for days between phases without holding
//! onto adjudicator internals.

mod error;
mod history;
mod power;
mod result;
mod rules;

pub use self::error::GameError;
pub use self::history::PhaseRecord;
pub use self::power::{Power, PowerStatus};
pub use self::result::{DislodgedUnit, OrderResult, ResultKind};
pub use self::rules::RuleFlag;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::calendar::Calendar;
use crate::geo::{standard_starting_units, Map, ProvinceKey, RegionKey};
use crate::judge::build::{self, to_initial_ownerships};
use crate::judge::retreat;
use crate::judge::{
    AttackOutcome, MappedBuildOrder, MappedMainOrder, MappedRetreatOrder, OrderOutcome, Rulebook,
    Submission,
};
use crate::order::{BuildCommand, Command, Order, RetreatCommand};
use crate::time::{Phase, Season, Time};
use crate::{Nation, Unit, UnitPosition, UnitPositions, UnitType};

/// Where a game is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    /// Players may still join; no orders are accepted yet.
    Forming,
    /// The game is being played.
    Active,
    /// The game has ended.
    Completed(Completion),
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Completion {
    /// A power controls at least `victory_threshold` supply centers.
    Victory(Nation),
    /// Every surviving power voted for a draw, or too few powers remain to continue.
    Draw(Vec<Nation>),
}

/// Which kind of order the game is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseKind {
    Movement,
    Retreat,
    Build,
}

impl From<Phase> for PhaseKind {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Main => PhaseKind::Movement,
            Phase::Retreat => PhaseKind::Retreat,
            Phase::Build => PhaseKind::Build,
        }
    }
}

/// A single game of Diplomacy: its map, its powers, its units, and the orders
/// pending for the current phase.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    id: String,
    #[cfg_attr(feature = "serde", serde(skip, default = "crate::geo::standard_map"))]
    map: &'static Map,
    calendar_start: Time,
    turn: usize,
    status: GameStatus,
    rules: BTreeSet<RuleFlag>,
    victory_threshold: u8,
    registration_password: Option<String>,
    powers: BTreeMap<Nation, Power>,
    units: Vec<UnitPosition<'static, RegionKey>>,
    centers: HashMap<ProvinceKey, Nation>,
    dislodged: HashMap<RegionKey, DislodgedUnit>,
    pending_main: HashMap<Nation, Vec<MappedMainOrder>>,
    pending_retreat: HashMap<Nation, Vec<MappedRetreatOrder>>,
    pending_build: HashMap<Nation, Vec<MappedBuildOrder>>,
    history: Vec<PhaseRecord>,
}

impl Game {
    /// Start a new, unstarted game on the standard map.
    pub fn new(id: impl Into<String>, nations: Vec<Nation>, rules: BTreeSet<RuleFlag>) -> Self {
        let powers = nations
            .into_iter()
            .map(|n| (n.clone(), Power::new(n)))
            .collect();

        Game {
            id: id.into(),
            map: crate::geo::standard_map(),
            calendar_start: Time::new(Season::Spring, 1901, Phase::Main),
            turn: 0,
            status: GameStatus::Forming,
            rules,
            victory_threshold: 18,
            registration_password: None,
            powers,
            units: Vec::new(),
            centers: HashMap::new(),
            dislodged: HashMap::new(),
            pending_main: HashMap::new(),
            pending_retreat: HashMap::new(),
            pending_build: HashMap::new(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn powers(&self) -> impl Iterator<Item = &Power> {
        self.powers.values()
    }

    pub fn units(&self) -> &[UnitPosition<'static, RegionKey>] {
        &self.units
    }

    pub fn centers(&self) -> &HashMap<ProvinceKey, Nation> {
        &self.centers
    }

    pub fn history(&self) -> &[PhaseRecord] {
        &self.history
    }

    pub fn current_time(&self) -> Time {
        self.calendar().nth(self.turn)
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.current_time().phase().into()
    }

    pub fn set_registration_password(&mut self, password: Option<String>) {
        self.registration_password = password;
    }

    pub fn registration_password(&self) -> Option<&str> {
        self.registration_password.as_deref()
    }

    /// Calendar used to convert turn numbers to named seasons. The standard variant's
    /// year pattern inserts a retreat phase after every movement phase and finishes
    /// the year with a single build phase in the fall.
    fn calendar(&self) -> Calendar {
        Calendar::new(
            self.calendar_start.clone(),
            vec![
                (Season::Spring, Phase::Main),
                (Season::Fall, Phase::Main),
                (Season::Fall, Phase::Build),
            ],
        )
        .expect("standard calendar is well-formed")
    }

    /// Deploy the standard opening units and supply center ownership, moving the
    /// game from `Forming` to `Active`.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::Forming {
            return Err(GameError::Conflict("game has already started".into()));
        }

        if self.powers.len() < 2 {
            return Err(GameError::Conflict(
                "at least two powers are required to start a game".into(),
            ));
        }

        self.units = standard_starting_units()
            .into_iter()
            .filter(|(nation, _, _)| self.powers.contains_key(nation))
            .map(|(nation, unit_type, region)| {
                UnitPosition::new(Unit::new(std::borrow::Cow::Owned(nation), unit_type), region)
            })
            .collect();

        self.centers = to_initial_ownerships(self.map)
            .into_iter()
            .filter(|(_, nation)| self.powers.contains_key(nation))
            .collect();

        self.status = GameStatus::Active;
        Ok(())
    }

    fn require_active(&self) -> Result<(), GameError> {
        match &self.status {
            GameStatus::Active => Ok(()),
            GameStatus::Forming => Err(GameError::Conflict("game has not started".into())),
            GameStatus::Completed(_) => Err(GameError::GameFinished),
        }
    }

    fn require_power(&self, nation: &Nation) -> Result<(), GameError> {
        self.powers
            .get(nation)
            .map(|_| ())
            .ok_or_else(|| GameError::NotAPower(nation.clone()))
    }

    fn require_not_civil_disorder(&self, nation: &Nation) -> Result<(), GameError> {
        if self.powers[nation].status() == PowerStatus::CivilDisorder {
            return Err(GameError::Conflict(format!(
                "{} is in civil disorder and cannot submit orders",
                nation
            )));
        }
        Ok(())
    }

    /// Mark `nation`'s controller as departed (`in_disorder: true`) or restored
    /// (`false`). A departed power's units default to holds (movement) or
    /// disbands (retreat, build) at the next adjudication, and its submissions
    /// are rejected until a controller reclaims it. Eliminated powers are left
    /// untouched; there is no controller left to depart or return.
    pub fn set_civil_disorder(&mut self, nation: &Nation, in_disorder: bool) -> Result<(), GameError> {
        self.require_power(nation)?;
        let power = self.powers.get_mut(nation).expect("checked by require_power");
        if power.status() == PowerStatus::Eliminated {
            return Ok(());
        }
        power.set_status(if in_disorder {
            PowerStatus::CivilDisorder
        } else {
            PowerStatus::Active
        });
        Ok(())
    }

    fn require_phase(&self, expected: PhaseKind) -> Result<(), GameError> {
        let current = self.phase_kind();
        if current == expected {
            Ok(())
        } else {
            Err(GameError::PhaseMismatch {
                expected: phase_kind_name(expected),
                current: phase_kind_name(current).to_string(),
            })
        }
    }

    /// Submit (or replace) this power's main-phase orders. Order text follows the
    /// engine's canonical grammar, e.g. `"ENG: F Lon -> Nth"`; the leading nation
    /// must match `nation`.
    pub fn submit_main_orders(
        &mut self,
        nation: &Nation,
        order_texts: &[String],
    ) -> Result<(), GameError> {
        self.require_active()?;
        self.require_power(nation)?;
        self.require_not_civil_disorder(nation)?;
        self.require_phase(PhaseKind::Movement)?;

        let orders = order_texts
            .iter()
            .map(|text| self.parse_main_order(nation, text))
            .collect::<Result<Vec<_>, _>>()?;

        self.pending_main.insert(nation.clone(), orders);
        Ok(())
    }

    pub fn submit_retreat_orders(
        &mut self,
        nation: &Nation,
        order_texts: &[String],
    ) -> Result<(), GameError> {
        self.require_active()?;
        self.require_power(nation)?;
        self.require_not_civil_disorder(nation)?;
        self.require_phase(PhaseKind::Retreat)?;

        let orders = order_texts
            .iter()
            .map(|text| self.parse_retreat_order(nation, text))
            .collect::<Result<Vec<_>, _>>()?;

        self.pending_retreat.insert(nation.clone(), orders);
        Ok(())
    }

    pub fn submit_build_orders(
        &mut self,
        nation: &Nation,
        order_texts: &[String],
    ) -> Result<(), GameError> {
        self.require_active()?;
        self.require_power(nation)?;
        self.require_not_civil_disorder(nation)?;
        self.require_phase(PhaseKind::Build)?;

        let orders = order_texts
            .iter()
            .map(|text| self.parse_build_order(nation, text))
            .collect::<Result<Vec<_>, _>>()?;

        self.pending_build.insert(nation.clone(), orders);
        Ok(())
    }

    pub fn submit_draw_vote(&mut self, nation: &Nation, vote: bool) -> Result<(), GameError> {
        self.require_active()?;
        self.require_power(nation)?;
        self.require_not_civil_disorder(nation)?;
        self.require_phase(PhaseKind::Movement)?;

        if self.rules.contains(&RuleFlag::Solitaire) {
            return Err(GameError::Conflict(
                "draws are disabled in solitaire games".into(),
            ));
        }

        let power = self
            .powers
            .get_mut(nation)
            .ok_or_else(|| GameError::NotAPower(nation.clone()))?;
        power.set_draw_vote(vote);
        Ok(())
    }

    fn parse_main_order(&self, nation: &Nation, text: &str) -> Result<MappedMainOrder, GameError> {
        let order: MappedMainOrder = text
            .parse()
            .map_err(|e: crate::parser::Error| GameError::OrderInvalid(e.to_string()))?;
        self.check_order_ownership(nation, &order)?;
        Ok(order)
    }

    fn parse_retreat_order(
        &self,
        nation: &Nation,
        text: &str,
    ) -> Result<MappedRetreatOrder, GameError> {
        let order: MappedRetreatOrder = text
            .parse()
            .map_err(|e: crate::parser::Error| GameError::OrderInvalid(e.to_string()))?;

        // Dislodged units are no longer reflected in `self.units`, so their ownership is
        // checked against the dislodged-unit snapshot taken at the end of the main phase
        // rather than against the current board.
        let dislodged = self.dislodged.get(&order.region).ok_or_else(|| {
            GameError::OrderInvalid(format!("{} is not a dislodged unit", order.region))
        })?;

        if dislodged.nation != *nation || dislodged.nation != order.nation {
            return Err(GameError::OrderInvalid(
                "order nation does not match the dislodged unit".into(),
            ));
        }

        if dislodged.unit_type != order.unit_type {
            return Err(GameError::OrderInvalid(
                "order unit type does not match the dislodged unit".into(),
            ));
        }

        Ok(order)
    }

    fn parse_build_order(
        &self,
        nation: &Nation,
        text: &str,
    ) -> Result<MappedBuildOrder, GameError> {
        let order: MappedBuildOrder = text
            .parse()
            .map_err(|e: crate::parser::Error| GameError::OrderInvalid(e.to_string()))?;

        if order.nation != *nation {
            return Err(GameError::OrderInvalid(
                "order nation does not match submitting power".into(),
            ));
        }

        // Build orders address empty home centers, so there is no existing unit
        // to check ownership of; disbands are checked against current units.
        if order.command == BuildCommand::Disband {
            self.check_order_ownership(nation, &order)?;
        }

        Ok(order)
    }

    fn check_order_ownership<C: Command<RegionKey>>(
        &self,
        nation: &Nation,
        order: &Order<RegionKey, C>,
    ) -> Result<(), GameError> {
        if order.nation != *nation {
            return Err(GameError::OrderInvalid(
                "order nation does not match submitting power".into(),
            ));
        }

        if self.rules.contains(&RuleFlag::NoCheck) {
            return Ok(());
        }

        match self.units.find_region_occupier(&order.region) {
            Some(unit) if unit.nation() == nation && unit.unit_type() == order.unit_type => {
                Ok(())
            }
            Some(_) => Err(GameError::OrderInvalid(format!(
                "{} does not control a unit at {}",
                nation, order.region
            ))),
            None => Err(GameError::OrderInvalid(format!(
                "no unit at {}",
                order.region
            ))),
        }
    }

    /// Adjudicate the current phase, advance to the next one, and return the
    /// phase records produced. More than one record is returned when a retreat
    /// phase is skipped because no units were dislodged.
    pub fn process(&mut self) -> Result<Vec<PhaseRecord>, GameError> {
        self.require_active()?;

        let mut records = Vec::new();
        loop {
            let record = match self.phase_kind() {
                PhaseKind::Movement => self.process_movement(),
                PhaseKind::Retreat => self.process_retreat(),
                PhaseKind::Build => self.process_build(),
            };
            records.push(record);

            if !matches!(self.status, GameStatus::Active) {
                break;
            }

            if self.phase_kind() == PhaseKind::Retreat && self.dislodged.is_empty() {
                continue;
            }

            break;
        }

        Ok(records)
    }

    fn process_movement(&mut self) -> PhaseRecord {
        let time = self.current_time();

        let all_orders: Vec<MappedMainOrder> = self
            .powers
            .keys()
            .filter(|n| self.powers[*n].status() != PowerStatus::Eliminated)
            .flat_map(|n| self.pending_main.remove(n).unwrap_or_default())
            .collect();

        let starting_state = self.units.clone();
        let mut submission = Submission::new(starting_state, all_orders);
        let prepared = submission.start_adjudication(self.map);
        let outcome = prepared.resolve_using(Rulebook::default());

        let results: Vec<OrderResult> = outcome
            .all_orders_with_outcomes()
            .map(|(order, outcome)| result::translate_main_order(order, outcome))
            .collect();

        let retreat_start = retreat::Start::new(&outcome);

        let mut dislodged = HashMap::new();
        for (&order, &dislodger) in retreat_start.dislodged() {
            let dislodged_unit = DislodgedUnit::from_start(order, dislodger, &retreat_start);
            dislodged.insert(order.region.clone(), dislodged_unit);
        }

        // `orders()` only yields orders that actually addressed a real unit (it excludes
        // the illegal ones rejected at submission time), so it is safe to treat each as
        // describing where that unit ends up.
        let outcomes_by_order: HashMap<&MappedMainOrder, &OrderOutcome<&MappedMainOrder>> =
            outcome.all_orders_with_outcomes().collect();

        let units_after: Vec<UnitPosition<'static, RegionKey>> = outcome
            .orders()
            .filter(|order| !dislodged.contains_key(&order.region))
            .map(|order| match outcomes_by_order[order] {
                OrderOutcome::Move(AttackOutcome::Succeeds) => {
                    let dest = order.command.move_dest().expect("move has a destination");
                    UnitPosition::new(
                        Unit::new(std::borrow::Cow::Owned(order.nation.clone()), order.unit_type),
                        dest.clone(),
                    )
                }
                _ => UnitPosition::new(
                    Unit::new(std::borrow::Cow::Owned(order.nation.clone()), order.unit_type),
                    order.region.clone(),
                ),
            })
            .collect();

        self.units = units_after.clone();
        self.dislodged = dislodged.clone();

        self.check_draw_votes();
        for power in self.powers.values_mut() {
            power.clear_draw_vote();
        }

        self.turn += 1;

        PhaseRecord {
            time,
            results,
            dislodged: dislodged.into_values().collect(),
            ownership_changes: Vec::new(),
            draw_votes: Vec::new(),
            units_after,
        }
    }

    fn process_retreat(&mut self) -> PhaseRecord {
        let time = self.current_time();

        let mut orders: Vec<MappedRetreatOrder> = self
            .powers
            .keys()
            .cloned()
            .flat_map(|n| self.pending_retreat.remove(&n).unwrap_or_default())
            .collect();

        // Any dislodged unit without a submitted order disbands.
        let ordered_regions: HashSet<RegionKey> =
            orders.iter().map(|o| o.region.clone()).collect();
        for (region, unit) in &self.dislodged {
            if !ordered_regions.contains(region) {
                orders.push(Order::new(
                    unit.nation.clone(),
                    unit.unit_type,
                    region.clone(),
                    RetreatCommand::Hold,
                ));
            }
        }

        // Resolve destination conflicts: if two or more retreating units target the
        // same province, all of them bounce and disband instead.
        let mut claims: HashMap<ProvinceKey, &MappedRetreatOrder> = HashMap::new();
        let mut contested: HashSet<ProvinceKey> = HashSet::new();
        for order in &orders {
            if let RetreatCommand::Move(dest) = &order.command {
                if claims.insert(dest.province().clone(), order).is_some() {
                    contested.insert(dest.province().clone());
                }
            }
        }

        let mut outcomes: HashMap<&MappedRetreatOrder, retreat::OrderOutcome<&MappedRetreatOrder>> =
            HashMap::new();
        for order in &orders {
            let outcome = match &order.command {
                RetreatCommand::Hold => retreat::OrderOutcome::DisbandsAsOrdered,
                RetreatCommand::Move(dest) => {
                    let available = self
                        .dislodged
                        .get(&order.region)
                        .map(|u| u.available_destinations.contains(dest))
                        .unwrap_or(false);

                    if !available {
                        retreat::OrderOutcome::InvalidDestination(retreat::DestStatus::Unreachable)
                    } else if contested.contains(dest.province()) {
                        let other = claims
                            .get(dest.province())
                            .copied()
                            .filter(|&o| o != order);
                        match other {
                            Some(other) => retreat::OrderOutcome::Prevented(other),
                            None => retreat::OrderOutcome::Moves,
                        }
                    } else {
                        retreat::OrderOutcome::Moves
                    }
                }
            };
            outcomes.insert(order, outcome);
        }

        let results: Vec<OrderResult> = orders
            .iter()
            .map(|order| result::translate_retreat_order(order, &outcomes[order]))
            .collect();

        let mut units_after = self.units.clone();
        for order in &orders {
            if let (RetreatCommand::Move(dest), retreat::OrderOutcome::Moves) =
                (&order.command, &outcomes[order])
            {
                units_after.push(UnitPosition::new(
                    Unit::new(std::borrow::Cow::Owned(order.nation.clone()), order.unit_type),
                    dest.clone(),
                ));
            }
        }

        self.units = units_after.clone();
        self.dislodged.clear();
        self.turn += 1;

        PhaseRecord {
            time,
            results,
            dislodged: Vec::new(),
            ownership_changes: Vec::new(),
            draw_votes: Vec::new(),
            units_after,
        }
    }

    fn process_build(&mut self) -> PhaseRecord {
        let time = self.current_time();

        let orders: Vec<MappedBuildOrder> = self
            .powers
            .keys()
            .cloned()
            .flat_map(|n| self.pending_build.remove(&n).unwrap_or_default())
            .collect();

        // Everything borrowed from `self` for adjudication is extracted into owned
        // values before this block ends, so the results can be applied to `self`
        // with ordinary mutable access afterward.
        let (results, owner_observations, final_units) = {
            let world = BuildWorldView {
                powers: &self.powers,
                units: &self.units,
            };

            let submission = build::Submission::new(self.map, &self.centers, &world, orders);
            let outcome = submission.adjudicate(Rulebook::default());

            let results: Vec<OrderResult> = outcome
                .order_outcomes()
                .map(|(order, outcome)| result::translate_build_order(order, outcome))
                .collect();

            let owner_observations: Vec<(ProvinceKey, Nation)> = self
                .map
                .provinces()
                .filter(|p| p.is_supply_center())
                .filter_map(|province| {
                    let key = ProvinceKey::from(province);
                    world.occupier(&key).map(|owner| (key, owner.clone()))
                })
                .collect();

            let final_units: Vec<UnitPosition<'static, RegionKey>> =
                outcome.to_final_unit_positions().collect();

            (results, owner_observations, final_units)
        };

        let mut ownership_changes = Vec::new();
        for (key, owner) in owner_observations {
            if self.centers.get(&key) != Some(&owner) {
                ownership_changes.push((key.clone(), owner.clone()));
                self.centers.insert(key, owner);
            }
        }

        self.units = final_units;

        for nation in self.powers.keys().cloned().collect::<Vec<_>>() {
            let has_units = self.units.iter().any(|u| u.nation() == &nation);
            let has_centers = self.centers.values().any(|n| n == &nation);
            let power = self.powers.get_mut(&nation).expect("power exists");
            if !has_units && !has_centers {
                power.set_status(PowerStatus::Eliminated);
            }
        }

        self.check_victory();
        self.turn += 1;

        PhaseRecord {
            time,
            results,
            dislodged: Vec::new(),
            ownership_changes,
            draw_votes: Vec::new(),
            units_after: self.units.clone(),
        }
    }

    fn check_draw_votes(&mut self) {
        if self.rules.contains(&RuleFlag::Solitaire) {
            return;
        }

        let active: Vec<&Power> = self
            .powers
            .values()
            .filter(|p| p.status() != PowerStatus::Eliminated)
            .collect();

        if !active.is_empty() && active.iter().all(|p| p.draw_vote()) {
            let voters = active.iter().map(|p| p.nation().clone()).collect();
            self.status = GameStatus::Completed(Completion::Draw(voters));
        }
    }

    fn check_victory(&mut self) {
        let mut counts: HashMap<&Nation, u8> = HashMap::new();
        for owner in self.centers.values() {
            *counts.entry(owner).or_insert(0) += 1;
        }

        if let Some((nation, _)) = counts
            .into_iter()
            .find(|(_, count)| *count >= self.victory_threshold)
        {
            self.status = GameStatus::Completed(Completion::Victory(nation.clone()));
        }
    }
}

fn phase_kind_name(kind: PhaseKind) -> &'static str {
    match kind {
        PhaseKind::Movement => "movement",
        PhaseKind::Retreat => "retreat",
        PhaseKind::Build => "build",
    }
}

/// Adapter exposing a `Game`'s unit positions to the build-phase adjudicator.
struct BuildWorldView<'a> {
    powers: &'a BTreeMap<Nation, Power>,
    units: &'a [UnitPosition<'static, RegionKey>],
}

impl build::WorldState for BuildWorldView<'_> {
    fn nations(&self) -> HashSet<&Nation> {
        self.powers.keys().collect()
    }

    fn occupier(&self, province: &ProvinceKey) -> Option<&Nation> {
        self.units
            .iter()
            .find(|u| u.region.province() == province)
            .map(|u| u.nation())
    }

    fn unit_count(&self, nation: &Nation) -> u8 {
        self.units.iter().filter(|u| u.nation() == nation).count() as u8
    }

    fn units(&self, nation: &Nation) -> HashSet<(UnitType, RegionKey)> {
        self.units
            .iter()
            .filter(|u| u.nation() == nation)
            .map(|u| (u.unit.unit_type(), u.region.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_game() -> Game {
        let nations = ["ENG", "FRA", "GER", "ITA", "AUS", "RUS", "TUR"]
            .iter()
            .map(|n| Nation::from(*n))
            .collect();
        let mut game = Game::new("test-game", nations, BTreeSet::new());
        game.start().unwrap();
        game
    }

    #[test]
    fn start_deploys_standard_units() {
        let game = standard_game();
        assert_eq!(game.units().len(), 22);
        assert_eq!(game.centers().len(), 22);
        assert_eq!(game.current_time(), Time::new(Season::Spring, 1901, Phase::Main));
    }

    #[test]
    fn starting_again_is_rejected() {
        let mut game = standard_game();
        assert!(game.start().is_err());
    }

    #[test]
    fn rejects_orders_for_foreign_units() {
        let mut game = standard_game();
        let eng = Nation::from("ENG");
        let err = game
            .submit_main_orders(&eng, &["FRA: A Par -> Bur".to_string()])
            .unwrap_err();
        assert!(matches!(err, GameError::OrderInvalid(_)));
    }

    #[test]
    fn unopposed_move_succeeds() {
        let mut game = standard_game();
        for nation in ["AUS", "FRA", "GER", "ITA", "RUS", "TUR"] {
            game.submit_main_orders(&Nation::from(nation), &[]).unwrap();
        }
        game.submit_main_orders(
            &Nation::from("ENG"),
            &["ENG: F Lon -> Nth".to_string()],
        )
        .unwrap();

        let records = game.process().unwrap();
        assert_eq!(records.len(), 1);
        assert!(game
            .units()
            .iter()
            .any(|u| u.nation() == &Nation::from("ENG") && u.region == RegionKey::new("nth", None)));
    }

    #[test]
    fn retreat_phase_skipped_when_nothing_dislodged() {
        let mut game = standard_game();
        for nation in ["ENG", "FRA", "GER", "ITA", "AUS", "RUS", "TUR"] {
            game.submit_main_orders(&Nation::from(nation), &[]).unwrap();
        }

        let records = game.process().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(game.phase_kind(), PhaseKind::Movement);
        assert_eq!(game.current_time().year(), 1901);
        assert_eq!(game.current_time().season(), Season::Fall);
    }

    #[test]
    fn civil_disorder_power_cannot_submit_orders() {
        let mut game = standard_game();
        let eng = Nation::from("ENG");
        game.set_civil_disorder(&eng, true).unwrap();

        let err = game
            .submit_main_orders(&eng, &["ENG: F Lon -> Nth".to_string()])
            .unwrap_err();
        assert!(matches!(err, GameError::Conflict(_)));
        assert_eq!(
            game.powers().find(|p| p.nation() == &eng).map(Power::status),
            Some(PowerStatus::CivilDisorder)
        );
    }

    #[test]
    fn reclaiming_a_power_restores_submissions() {
        let mut game = standard_game();
        let eng = Nation::from("ENG");
        game.set_civil_disorder(&eng, true).unwrap();
        game.set_civil_disorder(&eng, false).unwrap();

        game.submit_main_orders(&eng, &["ENG: F Lon -> Nth".to_string()])
            .unwrap();
    }

    #[test]
    fn eliminated_powers_ignore_civil_disorder_toggles() {
        let mut game = standard_game();
        let eng = Nation::from("ENG");
        {
            let power = game.powers.get_mut(&eng).unwrap();
            power.set_status(PowerStatus::Eliminated);
        }

        game.set_civil_disorder(&eng, true).unwrap();
        assert_eq!(
            game.powers().find(|p| p.nation() == &eng).map(Power::status),
            Some(PowerStatus::Eliminated)
        );
    }
}
