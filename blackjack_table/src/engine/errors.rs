//! Engine and dispatch error types.

use thiserror::Error;

/// Failures reported by a [`GameEngine`](super::GameEngine) transport.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("Engine returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The engine answered with errors for the operation
    #[error("Engine rejected request: {}", .0.join("; "))]
    Rejected(Vec<String>),

    /// The response body could not be decoded
    #[error("Malformed engine response: {0}")]
    Decode(String),

    /// The response decoded but lacked a required field
    #[error("Engine response missing field: {0}")]
    MissingField(&'static str),

    /// The response contradicts the request it answers
    #[error("Inconsistent engine response: {0}")]
    Inconsistent(String),
}

impl EngineError {
    /// Message suitable for the table's error slot.
    ///
    /// Transport and decoding details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            EngineError::Transport(_) => "Game engine unreachable".to_string(),
            EngineError::Status { status, .. } => format!("Game engine error ({status})"),
            EngineError::Decode(_) | EngineError::MissingField(_) | EngineError::Inconsistent(_) => {
                "Unexpected response from game engine".to_string()
            }
            EngineError::Rejected(messages) if messages.is_empty() => {
                "Request rejected by game engine".to_string()
            }
            EngineError::Rejected(messages) => messages.join("; "),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Decode(err.to_string())
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures raised by the [`ActionDispatcher`](super::ActionDispatcher).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No session has been started
    #[error("No active session")]
    MissingSession,

    /// No hand has been dealt
    #[error("No hand in progress")]
    MissingHand,

    /// The targeted spot has no engine id yet
    #[error("Spot has not been dealt")]
    MissingSpot,

    /// The engine call itself failed
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl DispatchError {
    /// Whether the request was refused before reaching the engine.
    pub fn is_local(&self) -> bool {
        !matches!(self, DispatchError::Engine(_))
    }

    pub fn client_message(&self) -> String {
        match self {
            DispatchError::Engine(err) => err.client_message(),
            other => other.to_string(),
        }
    }
}

/// Result type for dispatcher operations
pub type DispatchResult<T> = Result<T, DispatchError>;
