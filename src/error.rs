use thiserror::Error;

use crate::lifecycle::State;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything a lifecycle operation can report back to its direct caller.
///
/// Output of the runtime's own log/error stream never shows up here; that
/// goes through [`crate::diagnostics`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("surface is already bound to a live player")]
    AlreadyBound,

    #[error("surface not found: {0}")]
    SurfaceNotFound(String),

    #[error("bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("player is not running (state: {state})")]
    NotRunning { state: State },

    #[error("cannot {operation} a player that is {state}")]
    InvalidTransition { operation: &'static str, state: State },

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("teardown failed: {0}")]
    Teardown(String),
}

impl Error {
    pub(crate) fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
