/// Toggles that vary standard play. Unrecognized combinations are the caller's
/// responsibility; the engine does not attempt to reject contradictory rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleFlag {
    /// Skip the "does this order address a unit you control" pre-check and let
    /// illegal orders fall out of adjudication as `Void` instead of being rejected
    /// at submission time.
    NoCheck,
    /// Powers are assigned at game start rather than chosen by the players who
    /// join; membership is fixed once the game leaves `Forming`.
    PowerChoice,
    /// Builds may be placed in any owned supply center rather than only home
    /// centers. Not currently enforced by the adjudicator; recorded for callers
    /// that implement their own build legality check against this flag.
    BuildAny,
    /// The game has exactly one human or bot player; draws are disabled and the
    /// game only ends in victory or elimination.
    Solitaire,
}
