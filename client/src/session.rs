//! Wiring of the adapters into one signed-in client session.
//!
//! A session owns the single [`CredentialStore`] for its credentials
//! directory and shares it by `Arc` between the HTTP adapter (which reads the
//! bearer credential) and the executor (which refreshes it).

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use pagination::PaginationState;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ClientSettings, SettingsError};
use crate::domain::ports::{RefreshInvoker, RemoteCallInvoker};
use crate::domain::{
    AuthenticatedRequestExecutor, CallResult, CredentialPair, CredentialStore, ExecuteError,
};
use crate::outbound::http::{ApiRequest, HttpApiClient, HttpRefreshInvoker};
use crate::outbound::storage::FileCredentialStorage;

/// Errors raised while building a [`ClientSession`].
#[derive(Debug, Error)]
pub enum StartupError {
    /// Settings are missing or invalid.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The credentials directory could not be opened.
    #[error("failed to open credentials directory {path}: {source}")]
    CredentialsDir {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Client session backed by the file credential store and reqwest adapters.
pub struct ClientSession {
    store: Arc<CredentialStore>,
    api: HttpApiClient,
    executor: AuthenticatedRequestExecutor<HttpRefreshInvoker>,
}

impl ClientSession {
    /// Build a session from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] when settings are invalid, the credentials
    /// directory cannot be opened, or an HTTP client cannot be built.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, StartupError> {
        let base_url = settings.base_url()?;
        let refresh_endpoint = settings.refresh_endpoint()?;
        let credentials_dir = settings.credentials_dir()?;
        let timeout = settings.request_timeout();

        let storage = FileCredentialStorage::open(&credentials_dir).map_err(|source| {
            StartupError::CredentialsDir {
                path: credentials_dir.clone(),
                source,
            }
        })?;
        let store = Arc::new(CredentialStore::new(Arc::new(storage)));

        let api = HttpApiClient::new(base_url, timeout, store.clone())?;
        let refresher = Arc::new(HttpRefreshInvoker::new(refresh_endpoint, timeout)?);
        let executor = AuthenticatedRequestExecutor::new(refresher.clone(), store.clone())
            .with_marker(settings.expired_marker());

        info!(
            base_url = %api.base_url(),
            refresh_endpoint = %refresher.endpoint(),
            credentials_dir = %credentials_dir.display(),
            "client session ready"
        );
        Ok(Self {
            store,
            api,
            executor,
        })
    }

    /// Shared credential store.
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Whether a complete, well-formed credential pair is held.
    pub fn is_signed_in(&self) -> bool {
        self.store.pair().is_some()
    }

    /// Persist the pair obtained from a login flow.
    pub fn sign_in(&self, pair: &CredentialPair) {
        self.store.set(pair);
        info!(access_fp = %pair.access.fingerprint(), "signed in");
    }

    /// Forget the held credential pair.
    pub fn sign_out(&self) {
        self.store.clear();
        info!("signed out");
    }

    /// Run one authenticated call.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedRequestExecutor::execute`].
    pub async fn execute<T>(&self, request: &ApiRequest) -> Result<CallResult<T>, ExecuteError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.executor.execute(&self.api, request).await
    }

    /// Fetch the page `paging` currently points at and adopt the returned
    /// cursor.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedRequestExecutor::execute`].
    pub async fn fetch_page<T>(
        &self,
        request: ApiRequest,
        paging: &mut PaginationState,
    ) -> Result<CallResult<T>, ExecuteError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        fetch_page_with(&self.executor, &self.api, request, paging).await
    }
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("base_url", &self.api.base_url().as_str())
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

async fn fetch_page_with<R, I, T>(
    executor: &AuthenticatedRequestExecutor<R>,
    invoker: &I,
    request: ApiRequest,
    paging: &mut PaginationState,
) -> Result<CallResult<T>, ExecuteError>
where
    R: RefreshInvoker + ?Sized,
    I: RemoteCallInvoker<ApiRequest, T> + ?Sized,
    T: Send + 'static,
{
    let request = request.with_page(paging.page_request());
    let result = executor.execute(invoker, &request).await?;
    if let CallResult::List { page, .. } = &result {
        paging.set_paging(page.cursor.clone());
        debug!(
            page_index = page.cursor.page_index,
            total_pages = page.cursor.total_pages,
            "page cursor updated"
        );
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    //! Session wiring and page-fetch coverage without network access.

    use super::*;
    use crate::domain::ports::MockRefreshInvoker;
    use crate::domain::{ApiStatus, CredentialKind};
    use crate::test_support::{ScriptedRemoteCall, pair};
    use pagination::{IndexBase, Page, PageCursor};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn settings(credentials_dir: PathBuf) -> ClientSettings {
        ClientSettings {
            base_url: Some("https://api.atelier.test".to_owned()),
            refresh_path: None,
            credentials_dir: Some(credentials_dir),
            request_timeout_secs: 5,
            expired_marker: None,
            path: None,
            page_size: 20,
        }
    }

    #[rstest]
    fn sign_in_and_out_persist_through_files(temp: TempDir) {
        let dir = temp.path().join("credentials");
        let session = ClientSession::from_settings(&settings(dir.clone())).expect("session");

        session.sign_in(&pair("eyJaccess", "eyJrefresh"));
        assert!(session.is_signed_in());
        assert!(dir.join("accessToken").is_file());

        let reopened = ClientSession::from_settings(&settings(dir.clone())).expect("session");
        assert_eq!(
            reopened
                .store()
                .get(CredentialKind::Refresh)
                .map(|credential| credential.as_str().to_owned()),
            Some("eyJrefresh".to_owned())
        );

        reopened.sign_out();
        assert!(!session.is_signed_in());
        assert!(!dir.join("accessToken").exists());
    }

    #[rstest]
    fn missing_base_url_fails_startup(temp: TempDir) {
        let mut settings = settings(temp.path().to_path_buf());
        settings.base_url = None;

        let error = ClientSession::from_settings(&settings).expect_err("startup fails");

        assert!(matches!(
            error,
            StartupError::Settings(SettingsError::MissingBaseUrl)
        ));
    }

    fn cursor(page_index: u32) -> PageCursor {
        PageCursor {
            page_index,
            page_size: 2,
            total_items: 5,
            total_pages: 3,
            has_next_page: true,
            has_prev_page: page_index > 0,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_page_adopts_the_returned_cursor() {
        let store = Arc::new(CredentialStore::new(Arc::new(
            crate::domain::ports::InMemoryCredentialStorage::default(),
        )));
        let mut refresher = MockRefreshInvoker::new();
        refresher.expect_refresh().times(0);
        let executor = AuthenticatedRequestExecutor::new(Arc::new(refresher), store);
        let listed = CallResult::list(
            ApiStatus::OK,
            "OK",
            Page {
                items: vec!["Ball gown".to_owned(), "Sheath".to_owned()],
                cursor: cursor(1),
            },
        );
        let remote = ScriptedRemoteCall::new([Ok(listed.clone())]);
        let mut paging = PaginationState::new(IndexBase::Zero, 2);

        let result = fetch_page_with(&executor, &remote, ApiRequest::get("api/dresses"), &mut paging)
            .await
            .expect("call succeeds");

        assert_eq!(result, listed);
        assert_eq!(paging.cursor(), &cursor(1));
        assert_eq!(paging.go_next(), Ok(2));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_fetch_keeps_the_cursor() {
        let store = Arc::new(CredentialStore::new(Arc::new(
            crate::domain::ports::InMemoryCredentialStorage::default(),
        )));
        let mut refresher = MockRefreshInvoker::new();
        refresher.expect_refresh().times(0);
        let executor = AuthenticatedRequestExecutor::new(Arc::new(refresher), store);
        let remote: ScriptedRemoteCall<String> = ScriptedRemoteCall::new([Ok(
            CallResult::failure(ApiStatus::new(500), "Lỗi máy chủ"),
        )]);
        let mut paging = PaginationState::new(IndexBase::One, 10);
        let before = paging.cursor().clone();

        fetch_page_with(&executor, &remote, ApiRequest::get("api/dresses"), &mut paging)
            .await
            .expect("no transport error");

        assert_eq!(paging.cursor(), &before);
    }
}
