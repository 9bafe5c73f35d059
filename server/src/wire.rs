//! Frame shapes for the JSON dialect. One frame, one JSON object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::Token;

/// Which authentication/serialization level a request operates at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestLevel {
    Connection,
    Channel,
    Game,
}

/// A request frame as it arrives over the wire.
///
/// `phase` and `phase_dependent` only carry meaning for `RequestLevel::Game`
/// requests; the dispatcher ignores them otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFrame {
    pub request_id: String,
    pub name: String,
    #[serde(default)]
    pub token: Option<Token>,
    #[serde(default)]
    pub game_id: Option<String>,
    /// The phase the client believes the game is in, for phase-dependent requests.
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub phase_dependent: bool,
    /// Set when the reconnection routine is replaying this request after a
    /// dropped connection.
    #[serde(default)]
    pub re_sent: bool,
    /// The request-specific payload; shape depends on `name`.
    #[serde(default)]
    pub fields: Value,
}

/// A response frame, paired to a request by `request_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub request_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl ResponseFrame {
    pub fn ok(request_id: impl Into<String>, name: impl Into<String>, data: Value) -> Self {
        ResponseFrame {
            request_id: request_id.into(),
            name: name.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(
        request_id: impl Into<String>,
        name: impl Into<String>,
        error: &crate::error::ServerError,
    ) -> Self {
        ResponseFrame {
            request_id: request_id.into(),
            name: name.into(),
            data: None,
            error: Some(ErrorPayload {
                kind: error.kind().to_string(),
                message: error.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

/// A notification frame, pushed to a session outside the request/response cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationFrame {
    pub notification_id: u64,
    pub name: String,
    pub token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    pub fields: Value,
}
