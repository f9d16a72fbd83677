// ── Core error types ──
//
// Domain-level errors from oncohub-core. Views never see raw transport
// errors: the `From<oncohub_api::Error>` impl sorts them into the classes
// the UI distinguishes (server answered, no answer, bad answer), and
// `user_message` turns any of them into the single string slices store.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    // ── Client-side ──────────────────────────────────────────────────
    /// Caught before anything was sent.
    #[error("{message}")]
    Validation { message: String },

    // ── Server answered ──────────────────────────────────────────────
    #[error("Request failed with status code {status}")]
    Api {
        status: u16,
        /// Server-supplied `error` field.
        error: Option<String>,
        /// Server-supplied `message` field.
        message: Option<String>,
    },

    #[error("Unexpected response from server: {message}")]
    UnexpectedResponse { message: String },

    // ── No answer ────────────────────────────────────────────────────
    #[error("No response from server: {reason}")]
    NoResponse { reason: String },

    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Request cancelled")]
    Cancelled,

    // ── Setup ────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<oncohub_api::Error> for CoreError {
    fn from(err: oncohub_api::Error) -> Self {
        if err.is_no_response() {
            return CoreError::NoResponse {
                reason: err.to_string(),
            };
        }
        match err {
            oncohub_api::Error::Api { status, body } => CoreError::Api {
                status,
                error: body.error.filter(|s| !s.is_empty()),
                message: body.message.filter(|s| !s.is_empty()),
            },
            oncohub_api::Error::Deserialization { message, .. } => {
                CoreError::UnexpectedResponse { message }
            }
            oncohub_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            oncohub_api::Error::ClientSetup(message) => CoreError::Config { message },
            oncohub_api::Error::Transport(e) => CoreError::Internal(e.to_string()),
        }
    }
}

impl CoreError {
    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied text, `error` before `message`.
    pub fn server_text(&self) -> Option<&str> {
        match self {
            Self::Api { error, message, .. } => error.as_deref().or(message.as_deref()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Timeout or cancellation: the bound on the operation fired, not the
    /// server.
    pub fn is_bounded_out(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Cancelled)
    }

    /// The string a slice stores for this failure.
    ///
    /// Server text wins; validation messages and timeout/cancel notices
    /// are shown as-is; everything else becomes `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(text) = self.server_text() {
            return text.to_owned();
        }
        match self {
            Self::Validation { message } => message.clone(),
            Self::Timeout { .. } | Self::Cancelled => self.to_string(),
            _ => fallback.to_owned(),
        }
    }
}
