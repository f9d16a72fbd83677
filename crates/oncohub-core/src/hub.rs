// ── Hub ──
//
// Dependency container handed to every view: the API client, the slice
// store, the session store and the root cancellation token. Resource
// operations are inherent methods, split by resource into the `hub/`
// submodules.

mod account;
mod consultations;
mod doctor;
mod guidelines;
mod patients;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use oncohub_api::OncoHubClient;
use oncohub_api::transport::{TlsMode, TransportConfig};
use tokio_util::sync::CancellationToken;

use crate::bounds::{OperationBounds, ViewScope};
use crate::config::{Credentials, HubConfig, TlsVerification};
use crate::error::CoreError;
use crate::guard::RouteGuard;
use crate::route::Route;
use crate::session::SessionStore;
use crate::slice::{Slice, SliceState, Ticket};
use crate::store::AppStore;

/// Added to the operation timeout for the HTTP client's own limit, so the
/// operation bound is what fires.
const TRANSPORT_GRACE: Duration = Duration::from_secs(5);

/// Cheaply cloneable via `Arc<HubInner>`.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

struct HubInner {
    config: HubConfig,
    client: Arc<OncoHubClient>,
    store: AppStore,
    session: SessionStore,
    cancel: CancellationToken,
}

impl Hub {
    /// Build the API client from `config` and wire everything up.
    pub fn new(config: HubConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = OncoHubClient::new(
            config.api_url.clone(),
            config.confirm_url.clone(),
            &transport,
        )?;
        Ok(Self::with_client(config, client))
    }

    /// Wire up around an existing client.
    pub fn with_client(config: HubConfig, client: OncoHubClient) -> Self {
        let client = Arc::new(client);
        let store = AppStore::new(config.ordering);
        let session = SessionStore::new(Arc::clone(&client));
        Self {
            inner: Arc::new(HubInner {
                config,
                client,
                store,
                session,
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &OncoHubClient {
        &self.inner.client
    }

    pub fn store(&self) -> &AppStore {
        &self.inner.store
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Start a view lifetime. Drop the scope on teardown.
    pub fn mount(&self) -> ViewScope {
        ViewScope::new(self.inner.cancel.child_token())
    }

    /// A fresh guard for one protected view mount.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(Arc::clone(&self.inner.client), self.inner.config.timeout)
    }

    /// Default bounds for an operation started in `scope`.
    pub fn bounds(&self, scope: &ViewScope) -> OperationBounds {
        scope.bounds(self.inner.config.timeout)
    }

    pub async fn login(&self, credentials: &Credentials, scope: &ViewScope) -> Option<Route> {
        self.inner
            .session
            .login(credentials, &self.bounds(scope))
            .await
    }

    /// Log out; on success every slice goes back to its initial state.
    pub async fn logout(&self, scope: &ViewScope) -> Option<Route> {
        let route = self.inner.session.logout(&self.bounds(scope)).await;
        if route.is_some() {
            self.inner.store.reset_all();
        }
        route
    }

    /// Cancel every operation in every scope.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }
}

fn build_transport(config: &HubConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout.saturating_add(TRANSPORT_GRACE),
        cookie_jar: None,
    }
    .with_cookie_jar()
}

/// Await a bounded remote call and settle `ticket` with its outcome.
///
/// Success runs `apply`; failure stores `err.user_message(fallback)`.
/// Either may be dropped by the slice if the ticket was superseded.
async fn settle<T, R, F>(
    slice: &Slice<T>,
    ticket: Ticket,
    bounds: &OperationBounds,
    fallback: &str,
    call: F,
    apply: impl FnOnce(&mut SliceState<T>, R),
) -> Result<(), CoreError>
where
    T: Clone + Default,
    F: Future<Output = Result<R, oncohub_api::Error>>,
{
    match bounds.run(call).await {
        Ok(value) => {
            slice.fulfill(ticket, |state| apply(state, value));
            Ok(())
        }
        Err(err) => {
            slice.reject(ticket, err.user_message(fallback));
            Err(err)
        }
    }
}
