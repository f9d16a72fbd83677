// ── Session store ──
//
// Single source of truth for "is a session active" from this client's
// point of view. The session itself is a server-managed cookie; the store
// only infers state from login/logout outcomes.

use std::sync::Arc;

use oncohub_api::OncoHubClient;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::bounds::OperationBounds;
use crate::config::Credentials;
use crate::error::CoreError;
use crate::route::Route;

/// Body text the auth service sends on a successful login.
pub const LOGIN_SUCCESS_MARKER: &str = "Login successful";

const INVALID_CREDENTIALS: &str = "Invalid email or password.";
const SERVER_ERROR: &str = "Server error occurred. Please try again later or contact support.";
const NO_RESPONSE: &str = "No response from server. Please check your internet connection.";
const LOGIN_FALLBACK: &str = "An error occurred during login. Please try again.";
const LOGIN_REJECTED: &str = "Login failed. Please try again.";
const LOGOUT_FALLBACK: &str = "An error occurred during logout. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub last_error: Option<String>,
}

pub struct SessionStore {
    client: Arc<OncoHubClient>,
    state: watch::Sender<Session>,
    in_flight: watch::Sender<bool>,
}

/// Clears the in-flight flag however the login future ends.
struct InFlight<'a>(&'a watch::Sender<bool>);

impl<'a> InFlight<'a> {
    fn start(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

impl SessionStore {
    pub fn new(client: Arc<OncoHubClient>) -> Self {
        let (state, _) = watch::channel(Session::default());
        let (in_flight, _) = watch::channel(false);
        Self {
            client,
            state,
            in_flight,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Busy indicator: `true` while a login is outstanding.
    pub fn in_flight(&self) -> watch::Receiver<bool> {
        self.in_flight.subscribe()
    }

    pub fn is_logging_in(&self) -> bool {
        *self.in_flight.borrow()
    }

    /// Submit credentials.
    ///
    /// Returns `Some(Route::Patients)` when the server confirms the login;
    /// on any failure clears `is_authenticated`, records a message in
    /// `last_error` and returns `None`.
    pub async fn login(&self, credentials: &Credentials, bounds: &OperationBounds) -> Option<Route> {
        self.state.send_modify(|s| s.last_error = None);

        let result = {
            let _busy = InFlight::start(&self.in_flight);
            bounds
                .run(self.client.login(&credentials.email, &credentials.password))
                .await
        };

        match result {
            Ok(resp) if resp.message.as_deref() == Some(LOGIN_SUCCESS_MARKER) => {
                info!(email = %credentials.email, "logged in");
                self.state.send_replace(Session {
                    is_authenticated: true,
                    last_error: None,
                });
                Some(Route::Patients)
            }
            Ok(resp) => {
                warn!(message = ?resp.message, "login answered without success marker");
                self.login_failed(LOGIN_REJECTED.to_owned());
                None
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                self.login_failed(login_error_message(&err));
                None
            }
        }
    }

    /// End the session.
    ///
    /// Returns `Some(Route::Login)` on success. A failed logout records a
    /// message but leaves `is_authenticated` as it was.
    pub async fn logout(&self, bounds: &OperationBounds) -> Option<Route> {
        match bounds.run(self.client.logout()).await {
            Ok(_) => {
                info!("logged out");
                self.state.send_replace(Session::default());
                Some(Route::Login)
            }
            Err(err) => {
                warn!(error = %err, "logout failed");
                self.record_error(logout_error_message(&err));
                None
            }
        }
    }

    /// A failed login ends whatever session was held before it.
    fn login_failed(&self, message: String) {
        self.state.send_replace(Session {
            is_authenticated: false,
            last_error: Some(message),
        });
    }

    fn record_error(&self, message: String) {
        self.state.send_modify(|s| s.last_error = Some(message));
    }
}

/// Message shown for a failed login, most specific class first.
pub fn login_error_message(err: &CoreError) -> String {
    match err {
        CoreError::Api {
            status: 401, error, ..
        } => error.clone().unwrap_or_else(|| INVALID_CREDENTIALS.to_owned()),
        CoreError::Api { status, .. } if *status >= 500 => SERVER_ERROR.to_owned(),
        CoreError::Api { error: Some(e), .. } => e.clone(),
        CoreError::Api { .. } => err.to_string(),
        CoreError::NoResponse { .. } | CoreError::Timeout { .. } => NO_RESPONSE.to_owned(),
        _ => LOGIN_FALLBACK.to_owned(),
    }
}

/// Message shown for a failed logout.
pub fn logout_error_message(err: &CoreError) -> String {
    if let CoreError::Api {
        message: Some(m), ..
    } = err
    {
        return m.clone();
    }
    let text = err.to_string();
    if text.is_empty() {
        LOGOUT_FALLBACK.to_owned()
    } else {
        text
    }
}
