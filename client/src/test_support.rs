//! Test doubles for the client crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::ports::{
    RefreshError, RefreshInvoker, RefreshRequest, RefreshResponse, RemoteCallError,
    RemoteCallInvoker,
};
use crate::domain::{
    ApiStatus, CallResult, CredentialKind, CredentialPair, CredentialStore,
    DEFAULT_EXPIRED_MARKER,
};

/// Backend message used for expired access credentials in tests.
pub const EXPIRED_MESSAGE: &str = "Token đã hết hạn.";

/// Expired-credential envelope as the backend sends it.
pub fn expired<T>() -> CallResult<T> {
    debug_assert!(EXPIRED_MESSAGE.contains(DEFAULT_EXPIRED_MARKER));
    CallResult::failure(ApiStatus::UNAUTHORIZED, EXPIRED_MESSAGE)
}

/// Build a credential pair from literals known to be valid.
///
/// # Panics
///
/// Panics when either literal lacks the token marker.
pub fn pair(access: &str, refresh: &str) -> CredentialPair {
    match CredentialPair::parse(access, refresh) {
        Ok(pair) => pair,
        Err(error) => panic!("test credential literals must be well formed: {error}"),
    }
}

/// Successful refresh response carrying `pair`.
pub fn refreshed(pair: CredentialPair) -> RefreshResponse {
    RefreshResponse {
        status: ApiStatus::OK,
        message: "Làm mới token thành công".to_owned(),
        pair: Some(pair),
    }
}

/// Refresh response rejecting the refresh credential.
pub fn refresh_rejected() -> RefreshResponse {
    RefreshResponse {
        status: ApiStatus::UNAUTHORIZED,
        message: "Refresh token không hợp lệ".to_owned(),
        pair: None,
    }
}

fn pop_script<R, E>(
    script: &Mutex<VecDeque<Result<R, E>>>,
    exhausted: impl FnOnce() -> E,
) -> Result<R, E> {
    let next = match script.lock() {
        Ok(mut queue) => queue.pop_front(),
        Err(_) => None,
    };
    next.unwrap_or_else(|| Err(exhausted()))
}

/// Remote invoker replaying a fixed script of outcomes, one per call.
pub struct ScriptedRemoteCall<T> {
    script: Mutex<VecDeque<Result<CallResult<T>, RemoteCallError>>>,
    calls: AtomicUsize,
}

impl<T> ScriptedRemoteCall<T> {
    /// Replay `script` in order; calls past its end fail with a transport
    /// error.
    pub fn new(script: impl IntoIterator<Item = Result<CallResult<T>, RemoteCallError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P, T> RemoteCallInvoker<P, T> for ScriptedRemoteCall<T>
where
    P: Sync + 'static,
    T: Send + 'static,
{
    async fn invoke(&self, _payload: &P) -> Result<CallResult<T>, RemoteCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pop_script(&self.script, || {
            RemoteCallError::transport("remote call script exhausted")
        })
    }
}

/// Scripted remote invoker that keeps a copy of every payload it receives.
pub struct RecordingRemoteCall<P, T> {
    inner: ScriptedRemoteCall<T>,
    payloads: Mutex<Vec<P>>,
}

impl<P: Clone, T> RecordingRemoteCall<P, T> {
    /// Replay `script` like [`ScriptedRemoteCall`] while recording payloads.
    pub fn new(script: impl IntoIterator<Item = Result<CallResult<T>, RemoteCallError>>) -> Self {
        Self {
            inner: ScriptedRemoteCall::new(script),
            payloads: Mutex::new(Vec::new()),
        }
    }

    /// Payloads received so far, in call order.
    pub fn payloads(&self) -> Vec<P> {
        self.payloads
            .lock()
            .map(|payloads| payloads.clone())
            .unwrap_or_default()
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> usize {
        self.inner.calls()
    }
}

#[async_trait]
impl<P, T> RemoteCallInvoker<P, T> for RecordingRemoteCall<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Send + 'static,
{
    async fn invoke(&self, payload: &P) -> Result<CallResult<T>, RemoteCallError> {
        if let Ok(mut payloads) = self.payloads.lock() {
            payloads.push(payload.clone());
        }
        self.inner.invoke(payload).await
    }
}

/// Remote invoker that accepts exactly one access credential.
///
/// Calls made while the store holds `accepted` succeed with `item`; any other
/// state yields the expired-credential envelope.
pub struct SessionBoundRemoteCall<T> {
    store: Arc<CredentialStore>,
    accepted: String,
    item: T,
    calls: AtomicUsize,
}

impl<T> SessionBoundRemoteCall<T> {
    /// Accept calls authorised by `accepted`.
    pub fn new(store: Arc<CredentialStore>, accepted: impl Into<String>, item: T) -> Self {
        Self {
            store,
            accepted: accepted.into(),
            item,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P, T> RemoteCallInvoker<P, T> for SessionBoundRemoteCall<T>
where
    P: Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    async fn invoke(&self, _payload: &P) -> Result<CallResult<T>, RemoteCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let authorised = self
            .store
            .get(CredentialKind::Access)
            .is_some_and(|access| access.as_str() == self.accepted);
        tokio::task::yield_now().await;
        if authorised {
            Ok(CallResult::item(ApiStatus::OK, "OK", Some(self.item.clone())))
        } else {
            Ok(expired())
        }
    }
}

/// Refresh invoker replaying a fixed script, yielding once per call so
/// concurrent callers can interleave.
pub struct ScriptedRefreshInvoker {
    script: Mutex<VecDeque<Result<RefreshResponse, RefreshError>>>,
    calls: AtomicUsize,
}

impl ScriptedRefreshInvoker {
    /// Replay `script` in order; calls past its end fail with a transport
    /// error.
    pub fn new(script: impl IntoIterator<Item = Result<RefreshResponse, RefreshError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshInvoker for ScriptedRefreshInvoker {
    async fn refresh(&self, _request: &RefreshRequest) -> Result<RefreshResponse, RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        pop_script(&self.script, || {
            RefreshError::transport("refresh script exhausted")
        })
    }
}
