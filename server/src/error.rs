//! The error taxonomy surfaced verbatim in wire responses.

use diplomacy::game::GameError;

/// A failure reported back to a client in a response frame's `error` field.
///
/// Variant names match the wire vocabulary exactly; `Display` renders the
/// vocabulary name so a thin JSON layer can write `{"error": {"kind": ...}}`
/// without a separate mapping table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServerError {
    /// Unknown token, wrong password, or insufficient permission for the role held.
    #[error("AUTH: {0}")]
    Auth(String),

    /// Unknown game id, user, or channel.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Duplicate game id, power already controlled, or a rule violation at creation.
    #[error("CONFLICT: {0}")]
    Conflict(String),

    /// A phase-dependent request's carried phase did not match the current phase.
    #[error("PHASE_MISMATCH: expected {expected}, game is at {current}")]
    PhaseMismatch { expected: String, current: String },

    /// An order was syntactically or semantically invalid.
    #[error("ORDER_INVALID: {0}")]
    OrderInvalid(String),

    /// The mutation targeted a `COMPLETED` game.
    #[error("GAME_FINISHED")]
    GameFinished,

    /// Reconnection determined this re-sent request's phase is stale.
    #[error("OBSOLETE")]
    Obsolete,

    /// An engine invariant was violated. The offending game is quarantined; the
    /// process itself is not torn down.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl ServerError {
    /// The wire vocabulary name for this error, independent of the human-readable detail.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Auth(_) => "AUTH",
            ServerError::NotFound(_) => "NOT_FOUND",
            ServerError::Conflict(_) => "CONFLICT",
            ServerError::PhaseMismatch { .. } => "PHASE_MISMATCH",
            ServerError::OrderInvalid(_) => "ORDER_INVALID",
            ServerError::GameFinished => "GAME_FINISHED",
            ServerError::Obsolete => "OBSOLETE",
            ServerError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<GameError> for ServerError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::NotAPower(n) => ServerError::Auth(format!("{n} is not a member of this game")),
            GameError::NotFound(what) => ServerError::NotFound(what.to_string()),
            GameError::Conflict(msg) => ServerError::Conflict(msg),
            GameError::PhaseMismatch { expected, current } => ServerError::PhaseMismatch {
                expected: expected.to_string(),
                current,
            },
            GameError::OrderInvalid(msg) => ServerError::OrderInvalid(msg),
            GameError::GameFinished => ServerError::GameFinished,
            GameError::Obsolete => ServerError::Obsolete,
            GameError::Internal(msg) => ServerError::Internal(msg),
        }
    }
}
