use crate::Nation;

/// Failure modes for an operation against a [`Game`](super::Game).
///
/// Variant names mirror the error taxonomy surfaced to callers at the
/// session/dispatch layer so that a thin wrapper can translate a `GameError`
/// into a response code without re-deriving the reason from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The acting nation does not control the power it is trying to act as.
    #[error("{0} is not a member of this game")]
    NotAPower(Nation),

    /// The named power has nothing matching the request (no pending order, no such unit).
    #[error("no {0} found")]
    NotFound(&'static str),

    /// The request conflicts with state already recorded for this phase.
    #[error("{0}")]
    Conflict(String),

    /// The request was valid for some phase, but not the one the game is currently in.
    #[error("game is in phase {current}, not {expected}")]
    PhaseMismatch {
        expected: &'static str,
        current: String,
    },

    /// One or more submitted orders could not be parsed or do not address a unit the
    /// issuing power controls.
    #[error("invalid order: {0}")]
    OrderInvalid(String),

    /// The game has already reached a terminal phase (victory or draw).
    #[error("game has already finished")]
    GameFinished,

    /// The request referenced a phase or version of the game state that has since
    /// been superseded.
    #[error("request targeted an obsolete phase")]
    Obsolete,

    /// An invariant the engine relies on was violated; this indicates a bug rather
    /// than a misuse of the API.
    #[error("internal engine error: {0}")]
    Internal(String),
}
