use crate::{Nation, ShortName};
use std::borrow::Cow;
use std::fmt;

/// An identifier that references a province without borrowing its definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProvinceKey(String);

impl ProvinceKey {
    /// Create a new province key from its canonical short name.
    pub fn new(short_name: impl Into<String>) -> Self {
        ProvinceKey(short_name.into())
    }
}

impl ShortName for ProvinceKey {
    fn short_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.0)
    }
}

impl fmt::Display for ProvinceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProvinceKey {
    fn from(s: &str) -> Self {
        ProvinceKey::new(s)
    }
}

impl From<String> for ProvinceKey {
    fn from(s: String) -> Self {
        ProvinceKey(s)
    }
}

impl<'a> From<&'a Province> for ProvinceKey {
    fn from(p: &'a Province) -> Self {
        ProvinceKey::new(p.short_name.clone())
    }
}

/// Whether, and to whom, a province counts as a supply center for the purpose of the
/// build/disband phase.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupplyCenter {
    /// The province is not a supply center.
    None,
    /// The province is a supply center, but is not any nation's home center.
    Neutral,
    /// The province is a home supply center for the specified nation.
    Home(Nation),
}

/// A controllable area of the environment. Provinces are made up of one or more
/// regions (to account for bicoastal provinces).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Province {
    pub short_name: String,
    pub full_name: String,
    pub supply_center: SupplyCenter,
}

impl Province {
    /// Whether any nation can build or own a unit here as a result of controlling it.
    pub fn is_supply_center(&self) -> bool {
        !matches!(self.supply_center, SupplyCenter::None)
    }
}

impl ShortName for Province {
    fn short_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.short_name)
    }
}

impl<'a> From<&'a Province> for &'a str {
    fn from(p: &'a Province) -> Self {
        &p.short_name
    }
}
