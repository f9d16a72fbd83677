use serde::Deserialize;
use thiserror::Error;

/// The `{ "error": ..., "message": ... }` shape every e-OncoHub service
/// uses for non-2xx responses. Both fields are optional; services are not
/// consistent about which one they fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Decode a raw response body, falling back to an empty body when the
    /// server answered with something that is not the usual JSON shape.
    pub fn from_text(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// The first non-empty server-supplied text, `error` before `message`.
    pub fn text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.message.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Top-level error type for the `oncohub-api` crate.
///
/// Distinguishes the three failure classes the UI cares about:
/// the server answered with a non-2xx status ([`Error::Api`]), the request
/// never got an answer ([`Error::Transport`]), or the answer could not be
/// decoded ([`Error::Deserialization`]). `oncohub-core` maps these into
/// user-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Server answered ─────────────────────────────────────────────
    /// Non-2xx response, with whatever error body the server sent.
    #[error("HTTP {status}: {}", body.text().unwrap_or("no error details"))]
    Api { status: u16, body: ErrorBody },

    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, client-side timeout, etc.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed (TLS setup, CA file, ...).
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status of the response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied `error` field, if any.
    pub fn server_error(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => body.error.as_deref().filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    /// Server-supplied `message` field, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => body.message.as_deref().filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    /// Returns `true` for a 401 response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` for a 5xx response.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if the request was sent but no response came back.
    pub fn is_no_response(&self) -> bool {
        match self {
            Self::Transport(e) => !e.is_builder() && e.status().is_none(),
            _ => false,
        }
    }

    /// Returns `true` if the transport gave up waiting for the server.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_prefers_error_over_message() {
        let body = ErrorBody::from_text(r#"{"error":"User already exists","message":"ignored"}"#);
        assert_eq!(body.text(), Some("User already exists"));
    }

    #[test]
    fn error_body_falls_back_to_message() {
        let body = ErrorBody::from_text(r#"{"message":"Logged out"}"#);
        assert_eq!(body.text(), Some("Logged out"));
    }

    #[test]
    fn error_body_tolerates_non_json() {
        let body = ErrorBody::from_text("<html>Bad Gateway</html>");
        assert_eq!(body, ErrorBody::default());
        assert_eq!(body.text(), None);
    }

    #[test]
    fn status_class_helpers() {
        let unauthorized = Error::Api {
            status: 401,
            body: ErrorBody::default(),
        };
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_server_error());

        let bad_gateway = Error::Api {
            status: 502,
            body: ErrorBody::default(),
        };
        assert!(bad_gateway.is_server_error());
        assert!(!bad_gateway.is_no_response());
    }
}
