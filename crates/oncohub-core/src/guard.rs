// ── Route guard ──
//
// Gates protected views on a server-confirmed session. One guard is made
// per mount and performs at most one session check; the result is kept
// for the guard's lifetime and never retried.

use std::sync::Arc;
use std::time::Duration;

use oncohub_api::OncoHubClient;
use tokio::sync::{OnceCell, watch};
use tracing::{debug, warn};

use crate::bounds::ViewScope;
use crate::route::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectReason {
    /// The server answered that there is no session.
    NotAuthenticated,
    /// The check itself failed (network, non-2xx, timeout).
    CheckFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Check outstanding: render a neutral loading indicator only.
    Pending,
    /// Session valid: render the wrapped view.
    Render,
    /// Never render the wrapped view; go to `to` instead.
    Redirect { to: Route, reason: RedirectReason },
}

impl GuardState {
    pub fn allows_render(&self) -> bool {
        matches!(self, Self::Render)
    }

    pub fn redirect_target(&self) -> Option<Route> {
        match self {
            Self::Redirect { to, .. } => Some(*to),
            _ => None,
        }
    }
}

pub struct RouteGuard {
    client: Arc<OncoHubClient>,
    timeout: Duration,
    state: watch::Sender<GuardState>,
    outcome: OnceCell<GuardState>,
}

impl RouteGuard {
    pub(crate) fn new(client: Arc<OncoHubClient>, timeout: Duration) -> Self {
        let (state, _) = watch::channel(GuardState::Pending);
        Self {
            client,
            timeout,
            state,
            outcome: OnceCell::new(),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GuardState> {
        self.state.subscribe()
    }

    /// Run the session check (first call only) and return the outcome.
    pub async fn check(&self, scope: &ViewScope) -> GuardState {
        self.outcome
            .get_or_init(|| self.run_check(scope))
            .await
            .clone()
    }

    async fn run_check(&self, scope: &ViewScope) -> GuardState {
        let bounds = scope.bounds(self.timeout);
        let outcome = match bounds.run(self.client.check_session()).await {
            Ok(check) if check.is_logged_in => GuardState::Render,
            Ok(_) => {
                debug!("no active session");
                GuardState::Redirect {
                    to: Route::Login,
                    reason: RedirectReason::NotAuthenticated,
                }
            }
            Err(err) => {
                warn!(error = %err, "session check failed");
                GuardState::Redirect {
                    to: Route::Login,
                    reason: RedirectReason::CheckFailed(err.to_string()),
                }
            }
        };
        self.state.send_replace(outcome.clone());
        outcome
    }
}
