use crate::ShortName;
use std::fmt::Debug;
use std::hash::Hash;

/// An addressable location in the Diplomacy world.
///
/// This trait is used during order parsing and adjudication to allow orders that
/// reference regions by value (as parsed from text) to be compared against regions
/// borrowed from a [`Map`](super::Map).
pub trait Location: ShortName + Clone + Debug + PartialEq + Eq + Hash {
    /// The type identifying the province that contains this location.
    type Province: PartialEq + Eq + Hash + Clone + Debug;

    /// Gets the province containing this location.
    fn province(&self) -> &Self::Province;
}
