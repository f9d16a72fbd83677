// ── Bounded operations ──
//
// Every remote call runs under a deadline and a cancellation token. The
// token comes from the `ViewScope` of whoever started the call, so tearing
// the view down stops its outstanding requests instead of leaving a slice
// loading forever.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

use crate::error::CoreError;

/// Lifetime of one mounted view.
///
/// Dropping the scope cancels every operation started under it. Scopes are
/// created with [`Hub::mount`](crate::Hub::mount) and are children of the
/// hub's root token, so [`Hub::shutdown`](crate::Hub::shutdown) cancels
/// all of them at once.
pub struct ViewScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl ViewScope {
    pub(crate) fn new(token: CancellationToken) -> Self {
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    /// Cancel outstanding operations without dropping the scope.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Bounds for an operation started in this scope.
    pub fn bounds(&self, timeout: Duration) -> OperationBounds {
        OperationBounds {
            timeout,
            cancel: self.token.clone(),
        }
    }
}

/// Deadline plus cancellation for a single remote call.
#[derive(Debug, Clone)]
pub struct OperationBounds {
    pub timeout: Duration,
    pub cancel: CancellationToken,
}

impl OperationBounds {
    /// Run `fut` to completion unless the deadline passes or the token is
    /// cancelled first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, oncohub_api::Error>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!("operation cancelled");
                Err(CoreError::Cancelled)
            }
            res = tokio::time::timeout(self.timeout, fut) => match res {
                Ok(inner) => inner.map_err(CoreError::from),
                Err(_) => {
                    debug!(timeout = ?self.timeout, "operation timed out");
                    Err(CoreError::Timeout { timeout: self.timeout })
                }
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scope() -> ViewScope {
        ViewScope::new(CancellationToken::new())
    }

    #[tokio::test(start_paused = true)]
    async fn completes_within_deadline() {
        let bounds = scope().bounds(Duration::from_secs(5));
        let value = bounds.run(async { Ok::<_, oncohub_api::Error>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn hang_becomes_timeout() {
        let bounds = scope().bounds(Duration::from_secs(2));
        let err = bounds
            .run(std::future::pending::<Result<(), oncohub_api::Error>>())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::Timeout {
                timeout: Duration::from_secs(2)
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_scope_cancels() {
        let scope = scope();
        let bounds = scope.bounds(Duration::from_secs(60));
        drop(scope);
        let err = bounds
            .run(std::future::pending::<Result<(), oncohub_api::Error>>())
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::Cancelled);
    }
}
