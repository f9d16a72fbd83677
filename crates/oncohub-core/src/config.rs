// ── Runtime hub configuration ──
//
// Describes *where* the backend lives and how operations are bounded.
// Carries credentials but never touches disk: the front-end builds a
// `HubConfig` (usually from `oncohub-config`) and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::slice::ResponseOrdering;

/// Login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file (hospital PKI).
    CustomCa(PathBuf),
    /// Skip verification (local development backends).
    DangerAcceptInvalid,
}

/// Configuration for one e-OncoHub deployment.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// API gateway origin (e.g. `http://localhost`).
    pub api_url: Url,
    /// E-mail confirmation service origin (e.g. `http://localhost:8082`).
    pub confirm_url: Url,
    pub tls: TlsVerification,
    /// Upper bound for every remote operation.
    pub timeout: Duration,
    pub ordering: ResponseOrdering,
}

impl HubConfig {
    pub fn new(api_url: Url, confirm_url: Url) -> Self {
        Self {
            api_url,
            confirm_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            ordering: ResponseOrdering::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}
