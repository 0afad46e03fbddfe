//! Tests for the authenticated request executor.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    CredentialStorage, InMemoryCredentialStorage, MockRefreshInvoker, RefreshError,
    RefreshResponse, RemoteCallError,
};
use crate::domain::{ApiStatus, CallResult, CredentialKind, CredentialStore};
use crate::test_support::{
    RecordingRemoteCall, ScriptedRemoteCall, expired, pair, refresh_rejected, refreshed,
};

#[derive(Debug, Clone, PartialEq)]
struct DressQuery {
    id: &'static str,
}

const QUERY: DressQuery = DressQuery { id: "42" };

struct Harness {
    storage: Arc<InMemoryCredentialStorage>,
    store: Arc<CredentialStore>,
}

impl Harness {
    fn executor(
        &self,
        refresher: MockRefreshInvoker,
    ) -> AuthenticatedRequestExecutor<MockRefreshInvoker> {
        AuthenticatedRequestExecutor::new(Arc::new(refresher), self.store.clone())
    }

    fn stored(&self, kind: CredentialKind) -> Option<String> {
        self.storage
            .read(kind.storage_key())
            .expect("in-memory storage is always available")
    }
}

#[fixture]
fn signed_in() -> Harness {
    let storage = Arc::new(InMemoryCredentialStorage::default());
    let store = Arc::new(CredentialStore::new(storage.clone()));
    store.set(&pair("eyJold", "eyJrefresh"));
    Harness { storage, store }
}

#[fixture]
fn signed_out() -> Harness {
    let storage = Arc::new(InMemoryCredentialStorage::default());
    let store = Arc::new(CredentialStore::new(storage.clone()));
    Harness { storage, store }
}

fn ok_item(name: &str) -> CallResult<String> {
    CallResult::item(ApiStatus::OK, "OK", Some(name.to_owned()))
}

fn never_refreshes() -> MockRefreshInvoker {
    let mut refresher = MockRefreshInvoker::new();
    refresher.expect_refresh().times(0);
    refresher
}

#[rstest]
#[tokio::test]
async fn first_try_success_is_returned_unchanged(signed_in: Harness) {
    let remote = ScriptedRemoteCall::new([Ok(ok_item("Mermaid ivory gown"))]);
    let executor = signed_in.executor(never_refreshes());

    let result = executor.execute(&remote, &QUERY).await.expect("call succeeds");

    assert_eq!(result, ok_item("Mermaid ivory gown"));
    assert_eq!(remote.calls(), 1);
}

#[rstest]
#[case::bad_request(400, "Dữ liệu không hợp lệ")]
#[case::forbidden(403, "Token đã hết hạn.")]
#[case::not_found(404, "Không tìm thấy váy cưới")]
#[case::server_error(500, "Lỗi máy chủ")]
#[case::unauthorised_without_marker(401, "Sai mật khẩu")]
#[tokio::test]
async fn non_expiry_failures_are_not_retried(
    signed_in: Harness,
    #[case] status: u16,
    #[case] message: &str,
) {
    let failure: CallResult<String> = CallResult::failure(ApiStatus::new(status), message);
    let remote = ScriptedRemoteCall::new([Ok(failure.clone())]);
    let executor = signed_in.executor(never_refreshes());

    let result = executor.execute(&remote, &QUERY).await.expect("no transport error");

    assert_eq!(result, failure);
    assert_eq!(remote.calls(), 1);
    assert_eq!(signed_in.stored(CredentialKind::Access).as_deref(), Some("eyJold"));
}

#[rstest]
#[tokio::test]
async fn expiry_without_refresh_credential_returns_original(signed_out: Harness) {
    let remote = ScriptedRemoteCall::new([Ok(expired::<String>())]);
    let executor = signed_out.executor(never_refreshes());

    let result = executor.execute(&remote, &QUERY).await.expect("no transport error");

    assert_eq!(result, expired());
    assert_eq!(remote.calls(), 1);
}

#[rstest]
#[tokio::test]
async fn successful_refresh_persists_pair_and_returns_retry(signed_in: Harness) {
    let remote = RecordingRemoteCall::new([Ok(expired()), Ok(ok_item("A-line champagne"))]);
    let mut refresher = MockRefreshInvoker::new();
    refresher
        .expect_refresh()
        .withf(|request| request.refresh.as_str() == "eyJrefresh")
        .times(1)
        .returning(|_| Ok(refreshed(pair("eyJnew", "eyJnew2"))));
    let executor = signed_in.executor(refresher);

    let result = executor.execute(&remote, &QUERY).await.expect("retry succeeds");

    assert_eq!(result, ok_item("A-line champagne"));
    assert_eq!(remote.payloads(), vec![QUERY, QUERY]);
    assert_eq!(signed_in.stored(CredentialKind::Access).as_deref(), Some("eyJnew"));
    assert_eq!(signed_in.stored(CredentialKind::Refresh).as_deref(), Some("eyJnew2"));
}

#[rstest]
#[tokio::test]
async fn retried_failure_is_returned_without_another_refresh(signed_in: Harness) {
    let remote = ScriptedRemoteCall::new([Ok(expired::<String>()), Ok(expired())]);
    let mut refresher = MockRefreshInvoker::new();
    refresher
        .expect_refresh()
        .times(1)
        .returning(|_| Ok(refreshed(pair("eyJnew", "eyJnew2"))));
    let executor = signed_in.executor(refresher);

    let result = executor.execute(&remote, &QUERY).await.expect("no transport error");

    assert_eq!(result, expired());
    assert_eq!(remote.calls(), 2);
    assert_eq!(signed_in.stored(CredentialKind::Refresh).as_deref(), Some("eyJnew2"));
}

#[rstest]
#[tokio::test]
async fn rejected_refresh_clears_store_and_returns_original(signed_in: Harness) {
    let remote = ScriptedRemoteCall::new([Ok(expired::<String>())]);
    let mut refresher = MockRefreshInvoker::new();
    refresher
        .expect_refresh()
        .times(1)
        .returning(|_| Ok(refresh_rejected()));
    let executor = signed_in.executor(refresher);

    let result = executor.execute(&remote, &QUERY).await.expect("no transport error");

    assert_eq!(result, expired());
    assert_eq!(remote.calls(), 1);
    assert_eq!(signed_in.stored(CredentialKind::Access), None);
    assert_eq!(signed_in.stored(CredentialKind::Refresh), None);
}

#[rstest]
#[tokio::test]
async fn successful_refresh_without_pair_counts_as_rejection(signed_in: Harness) {
    let remote = ScriptedRemoteCall::new([Ok(expired::<String>())]);
    let mut refresher = MockRefreshInvoker::new();
    refresher.expect_refresh().times(1).returning(|_| {
        Ok(RefreshResponse {
            status: ApiStatus::OK,
            message: "OK".to_owned(),
            pair: None,
        })
    });
    let executor = signed_in.executor(refresher);

    let result = executor.execute(&remote, &QUERY).await.expect("no transport error");

    assert_eq!(result, expired());
    assert!(signed_in.store.pair().is_none());
}

#[rstest]
#[tokio::test]
async fn refresh_error_clears_store_and_propagates(signed_in: Harness) {
    let remote = ScriptedRemoteCall::new([Ok(expired::<String>())]);
    let mut refresher = MockRefreshInvoker::new();
    refresher
        .expect_refresh()
        .times(1)
        .returning(|_| Err(RefreshError::transport("connection reset")));
    let executor = signed_in.executor(refresher);

    let error = executor
        .execute(&remote, &QUERY)
        .await
        .expect_err("refresh failure propagates");

    assert_eq!(
        error,
        ExecuteError::Refresh(RefreshError::transport("connection reset"))
    );
    assert_eq!(remote.calls(), 1);
    assert!(signed_in.store.pair().is_none());
}

#[rstest]
#[tokio::test]
async fn transport_failure_propagates_without_refresh(signed_in: Harness) {
    let remote: ScriptedRemoteCall<String> =
        ScriptedRemoteCall::new([Err(RemoteCallError::timeout("30s elapsed"))]);
    let executor = signed_in.executor(never_refreshes());

    let error = executor
        .execute(&remote, &QUERY)
        .await
        .expect_err("transport failure propagates");

    assert_eq!(error, ExecuteError::Remote(RemoteCallError::timeout("30s elapsed")));
    assert!(signed_in.store.pair().is_some());
}

#[rstest]
#[tokio::test]
async fn retry_transport_failure_propagates(signed_in: Harness) {
    let remote: ScriptedRemoteCall<String> = ScriptedRemoteCall::new([
        Ok(expired()),
        Err(RemoteCallError::transport("network unreachable")),
    ]);
    let mut refresher = MockRefreshInvoker::new();
    refresher
        .expect_refresh()
        .times(1)
        .returning(|_| Ok(refreshed(pair("eyJnew", "eyJnew2"))));
    let executor = signed_in.executor(refresher);

    let error = executor
        .execute(&remote, &QUERY)
        .await
        .expect_err("second call fails");

    assert!(matches!(error, ExecuteError::Remote(RemoteCallError::Transport { .. })));
    assert_eq!(signed_in.stored(CredentialKind::Access).as_deref(), Some("eyJnew"));
}

#[rstest]
#[tokio::test]
async fn custom_marker_controls_expiry_detection(signed_in: Harness) {
    let remote = ScriptedRemoteCall::new([Ok(expired::<String>())]);
    let executor = signed_in
        .executor(never_refreshes())
        .with_marker(ExpiredCredentialMarker::new("jwt expired"));

    let result = executor.execute(&remote, &QUERY).await.expect("no transport error");

    assert_eq!(result, expired());
    assert_eq!(executor.marker().as_str(), "jwt expired");
}

#[rstest]
#[tokio::test]
async fn later_calls_after_rejection_skip_refresh(signed_in: Harness) {
    let remote = ScriptedRemoteCall::new([Ok(expired::<String>()), Ok(expired())]);
    let mut refresher = MockRefreshInvoker::new();
    refresher
        .expect_refresh()
        .times(1)
        .returning(|_| Ok(refresh_rejected()));
    let executor = signed_in.executor(refresher);

    executor.execute(&remote, &QUERY).await.expect("first call");
    let result = executor.execute(&remote, &QUERY).await.expect("second call");

    assert_eq!(result, expired());
    assert_eq!(remote.calls(), 2);
}
