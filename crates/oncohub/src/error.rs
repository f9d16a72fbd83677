//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use oncohub_config::ConfigError;
use oncohub_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("No response from server")]
    #[diagnostic(
        code(oncohub::no_response),
        help(
            "Check that the e-OncoHub gateway is running and reachable.\n\
             {reason}\n\
             Override the address with --api-url."
        )
    )]
    NoResponse { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(oncohub::timeout),
        help("Increase the limit with --timeout or check the server's responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(oncohub::auth_failed),
        help("Check the account for profile '{profile}'. Run: oncohub config set-password")
    )]
    AuthFailed { message: String, profile: String },

    #[error("Session not accepted: {reason}")]
    #[diagnostic(code(oncohub::session_rejected), help("Run: oncohub login"))]
    SessionRejected { reason: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(oncohub::no_credentials),
        help(
            "Configure an account with: oncohub config init\n\
             Or set ONCOHUB_EMAIL and ONCOHUB_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Server answered ──────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(oncohub::not_found))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(oncohub::rejected))]
    Rejected { message: String },

    #[error("Request cancelled")]
    #[diagnostic(code(oncohub::cancelled))]
    Cancelled,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(oncohub::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(oncohub::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: oncohub config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(oncohub::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(oncohub::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoResponse { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::SessionRejected { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Map a failed operation, preferring the message its slice stored.
    pub fn from_core(err: CoreError, stored: Option<String>) -> Self {
        match err {
            CoreError::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::NoResponse { reason } => Self::NoResponse { reason },
            CoreError::Timeout { timeout } => Self::Timeout {
                seconds: timeout.as_secs(),
            },
            CoreError::Cancelled => Self::Cancelled,
            unauthorized @ CoreError::Api { status: 401, .. } => Self::SessionRejected {
                reason: stored.unwrap_or_else(|| unauthorized.to_string()),
            },
            missing @ CoreError::Api { status: 404, .. } => Self::NotFound {
                message: stored.unwrap_or_else(|| missing.to_string()),
            },
            other => Self::Rejected {
                message: stored.unwrap_or_else(|| other.to_string()),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::from_core(err, None)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn stored_slice_message_wins() {
        let err = CliError::from_core(
            CoreError::Api {
                status: 500,
                error: None,
                message: None,
            },
            Some("Failed to fetch patients.".into()),
        );
        assert_eq!(err.to_string(), "Failed to fetch patients.");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn exit_codes_follow_error_class() {
        let timeout = CliError::from(CoreError::Timeout {
            timeout: Duration::from_secs(30),
        });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let missing = CliError::from_core(
            CoreError::Api {
                status: 404,
                error: None,
                message: None,
            },
            None,
        );
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let invalid = CliError::from(CoreError::Validation {
            message: "Rmn file is required".into(),
        });
        assert_eq!(invalid.exit_code(), exit_code::USAGE);
        assert_eq!(invalid.to_string(), "Invalid input: Rmn file is required");
    }
}
