//! The model for an order issued to a unit.

use crate::geo::Location;
use crate::{Nation, ShortName, Unit, UnitPosition, UnitType};
use std::fmt;

mod command;
pub use self::command::{
    build_phase::BuildCommand,
    main_phase::{ConvoyedMove, MainCommand, MoveCommand, SupportedOrder},
    retreat_phase::RetreatCommand,
};

/// Commands are the part of an order that says what a unit should do. An order pairs
/// a command with the unit's current location and owning nation.
pub trait Command<L> {
    /// If the command is a move (or something that behaves like one, such as a convoyed
    /// move), this returns the destination.
    fn move_dest(&self) -> Option<&L> {
        None
    }

    /// Whether the command is a move from the unit's current region to another region.
    fn is_move(&self) -> bool {
        false
    }
}

/// An order is issued by a nation and gives a command to a unit in a region.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order<L, C> {
    /// The nation to which the commanded unit belongs.
    pub nation: Nation,

    /// The type of unit addressed.
    pub unit_type: UnitType,

    /// The region in which the addressed unit resides.
    pub region: L,

    /// The command dispatched to the order's region.
    pub command: C,
}

impl<L, C> Order<L, C> {
    /// Create a new order.
    pub fn new(nation: Nation, unit_type: UnitType, region: L, command: C) -> Self {
        Order {
            nation,
            unit_type,
            region,
            command,
        }
    }
}

impl<L: Location, C: Command<L>> Order<L, C> {
    /// Whether this order is a move whose destination lies in `province`.
    pub fn is_move_to_province(&self, province: &L::Province) -> bool {
        self.move_dest().map(Location::province) == Some(province)
    }

    /// A view of the unit this order was issued to and the region it currently occupies.
    pub fn unit_position(&self) -> UnitPosition<'_, &L> {
        UnitPosition::from(self)
    }
}

impl<L, C: Command<L>> Command<L> for Order<L, C> {
    fn move_dest(&self) -> Option<&L> {
        self.command.move_dest()
    }

    fn is_move(&self) -> bool {
        self.command.is_move()
    }
}

impl<'a, L, C> From<&'a Order<L, C>> for Unit<'a> {
    fn from(order: &'a Order<L, C>) -> Self {
        Unit::new(std::borrow::Cow::Borrowed(&order.nation), order.unit_type)
    }
}

impl<'a, L, C> From<&'a Order<L, C>> for UnitPosition<'a, &'a L> {
    fn from(order: &'a Order<L, C>) -> Self {
        UnitPosition::new(Unit::from(order), &order.region)
    }
}

impl<L: ShortName, C: fmt::Display> Order<L, C> {
    /// Write the canonical form of the order to the formatter.
    ///
    /// For readability, this is used by both the Debug and Display traits.
    fn write_short(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} {}",
            self.nation.short_name(),
            self.unit_type.short_name(),
            self.region.short_name(),
            self.command
        )
    }
}

impl<L: ShortName, C: fmt::Display> fmt::Display for Order<L, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_short(f)
    }
}

impl<L: ShortName, C: fmt::Display> fmt::Debug for Order<L, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_short(f)
    }
}

pub type MainOrder<L> = Order<L, MainCommand<L>>;
pub type RetreatOrder<L> = Order<L, RetreatCommand<L>>;
pub type BuildOrder<L> = Order<L, BuildCommand>;
