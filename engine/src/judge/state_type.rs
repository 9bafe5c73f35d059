use std::fmt;

/// Whether an order succeeded or failed during adjudication.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderState {
    Succeeds,
    Fails,
}

impl From<bool> for OrderState {
    fn from(succeeded: bool) -> Self {
        if succeeded {
            OrderState::Succeeds
        } else {
            OrderState::Fails
        }
    }
}

impl From<OrderState> for bool {
    fn from(os: OrderState) -> Self {
        os == OrderState::Succeeds
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderState::Succeeds => write!(f, "succeeds"),
            OrderState::Fails => write!(f, "fails"),
        }
    }
}

/// The reason an order was never submitted for adjudication.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidOrder {
    /// There is no unit in position to act on the order.
    NoUnit,
    /// There is a unit in the region to which the order is addressed, but it belongs to a
    /// nation other than the order issuer.
    ForeignUnit,
    /// The owning nation issued multiple orders to the same unit, and this order was discarded
    /// as a result.
    MultipleToSameUnit,
    /// There is no path for the unit to follow, even assuming all existing fleets are ordered
    /// to convoy the unit from its current location to its destination.
    UnreachableDestination,
}

impl From<&'_ InvalidOrder> for OrderState {
    fn from(_: &InvalidOrder) -> Self {
        OrderState::Fails
    }
}

impl fmt::Display for InvalidOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidOrder::NoUnit => write!(f, "no unit in position to receive this order"),
            InvalidOrder::ForeignUnit => write!(f, "unit in position belongs to another nation"),
            InvalidOrder::MultipleToSameUnit => {
                write!(f, "unit already received an order this turn")
            }
            InvalidOrder::UnreachableDestination => {
                write!(f, "no possible path to the ordered destination")
            }
        }
    }
}
