//! Authenticated request execution with one transparent credential refresh.
//!
//! A call that comes back with the expired-credential marker is retried once
//! after exchanging the held refresh credential for a new pair. Everything
//! else is handed back untouched:
//!
//! ```text
//! Called ─┬─ success ─────────────────────────────► return first result
//!         ├─ other failure ───────────────────────► return first result
//!         └─ expired ─┬─ no refresh credential ───► return first result
//!                     ├─ refresh errored ─────────► clear store, return error
//!                     ├─ refresh rejected ────────► clear store, return first result
//!                     └─ refresh ok ── store pair, call again ► return second result
//! ```
//!
//! Concurrent calls that hit the expired branch together share a single
//! refresh: the first one through the refresh gate performs it and bumps the
//! session generation, the others notice the bump and go straight to their
//! retry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    RefreshError, RefreshInvoker, RefreshRequest, RemoteCallError, RemoteCallInvoker,
};
use crate::domain::{CallResult, CredentialKind, CredentialStore, ExpiredCredentialMarker};

/// Errors surfaced by [`AuthenticatedRequestExecutor::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    /// A remote call failed at the transport level.
    #[error(transparent)]
    Remote(#[from] RemoteCallError),
    /// The credential refresh failed at the transport level. The credential
    /// store has been cleared.
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

/// What the refresh step decided for the current call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Renewal {
    /// A usable pair is stored; retry the call.
    Renewed,
    /// No usable pair; hand back the original result.
    Unavailable,
}

/// Executes remote calls on behalf of a signed-in session.
pub struct AuthenticatedRequestExecutor<R: ?Sized> {
    store: Arc<CredentialStore>,
    marker: ExpiredCredentialMarker,
    refresh_gate: Mutex<()>,
    generation: AtomicU64,
    refresher: Arc<R>,
}

impl<R> AuthenticatedRequestExecutor<R>
where
    R: RefreshInvoker + ?Sized,
{
    /// Create an executor refreshing through `refresher` and persisting into
    /// `store`, using the default expired-credential marker.
    pub fn new(refresher: Arc<R>, store: Arc<CredentialStore>) -> Self {
        Self {
            store,
            marker: ExpiredCredentialMarker::default(),
            refresh_gate: Mutex::new(()),
            generation: AtomicU64::new(0),
            refresher,
        }
    }

    /// Replace the expired-credential marker.
    #[must_use]
    pub fn with_marker(mut self, marker: ExpiredCredentialMarker) -> Self {
        self.marker = marker;
        self
    }

    /// Credential store shared with the adapters.
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Marker used to detect expired credentials.
    pub fn marker(&self) -> &ExpiredCredentialMarker {
        &self.marker
    }

    /// Run `payload` through `invoker`, refreshing credentials and retrying
    /// once if the backend reports an expired access credential.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Remote`] when either call fails at the
    /// transport level, and [`ExecuteError::Refresh`] when the refresh call
    /// does (after clearing the credential store).
    pub async fn execute<P, T, I>(
        &self,
        invoker: &I,
        payload: &P,
    ) -> Result<CallResult<T>, ExecuteError>
    where
        I: RemoteCallInvoker<P, T> + ?Sized,
        P: Sync + 'static,
        T: Send + 'static,
    {
        let generation = self.generation.load(Ordering::Acquire);
        let first = invoker.invoke(payload).await?;

        if first.is_success() {
            return Ok(first);
        }
        if !first.is_credential_expired(&self.marker) {
            debug!(status = %first.status(), "call failed without credential expiry");
            return Ok(first);
        }

        debug!("access credential expired");
        match self.renew_session(generation).await? {
            Renewal::Renewed => {
                let retried = invoker.invoke(payload).await?;
                debug!(status = %retried.status(), "retried call after credential refresh");
                Ok(retried)
            }
            Renewal::Unavailable => Ok(first),
        }
    }

    async fn renew_session(&self, observed_generation: u64) -> Result<Renewal, RefreshError> {
        if self.store.get(CredentialKind::Refresh).is_none() {
            debug!("no refresh credential held; returning original result");
            return Ok(Renewal::Unavailable);
        }

        let _gate = self.refresh_gate.lock().await;

        if self.generation.load(Ordering::Acquire) != observed_generation {
            // Another call refreshed or cleared the session while this one was in flight.
            let renewal = if self.store.pair().is_some() {
                Renewal::Renewed
            } else {
                Renewal::Unavailable
            };
            debug!(?renewal, "session changed by a concurrent refresh");
            return Ok(renewal);
        }

        let Some(refresh) = self.store.get(CredentialKind::Refresh) else {
            return Ok(Renewal::Unavailable);
        };
        let refresh_fp = refresh.fingerprint();

        let response = match self.refresher.refresh(&RefreshRequest { refresh }).await {
            Ok(response) => response,
            Err(error) => {
                warn!(
                    refresh_fp = %refresh_fp,
                    error.kind = error.kind(),
                    %error,
                    "credential refresh failed; clearing session"
                );
                self.invalidate();
                return Err(error);
            }
        };

        let status = response.status;
        match response.into_renewed_pair() {
            Some(pair) => {
                self.store.set(&pair);
                self.generation.fetch_add(1, Ordering::AcqRel);
                info!(
                    refresh_fp = %refresh_fp,
                    access_fp = %pair.access.fingerprint(),
                    "credential pair refreshed"
                );
                Ok(Renewal::Renewed)
            }
            None => {
                warn!(
                    refresh_fp = %refresh_fp,
                    %status,
                    "credential refresh rejected; clearing session"
                );
                self.invalidate();
                Ok(Renewal::Unavailable)
            }
        }
    }

    fn invalidate(&self) {
        self.store.clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl<R: ?Sized> std::fmt::Debug for AuthenticatedRequestExecutor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedRequestExecutor")
            .field("marker", &self.marker)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "auth_executor_tests.rs"]
mod tests;
