//! Reqwest-backed remote call adapter.
//!
//! This adapter owns transport details only: URL resolution, the bearer
//! header, timeout and transport error mapping, and envelope decoding. It
//! never refreshes credentials; that is the executor's job.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagination::PageRequest;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::envelope::{body_preview, decode_call_result};
use crate::domain::ports::{RemoteCallError, RemoteCallInvoker};
use crate::domain::{CallResult, CredentialKind, CredentialStore};

/// One backend call, relative to the client's base URL.
///
/// # Examples
/// ```
/// use client::outbound::http::ApiRequest;
/// use pagination::PageRequest;
///
/// let request = ApiRequest::get("/api/dresses")
///     .with_query("category", "mermaid")
///     .with_page(PageRequest { page_index: 2, page_size: 12 });
/// assert_eq!(request.query.len(), 1);
/// assert!(request.page.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL. A leading `/` is ignored.
    pub path: String,
    /// Extra query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Page window to request, rendered as `pageIndex`/`pageSize`.
    pub page: Option<PageRequest>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Request with no query or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            page: None,
            body: None,
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path` with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::POST, path)
        }
    }

    /// Append one query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Request a specific page window.
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }
}

/// Remote call adapter sending [`ApiRequest`]s to one backend.
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
    store: Arc<CredentialStore>,
}

impl HttpApiClient {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout. The access credential is read from `store` on every call.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        store: Arc<CredentialStore>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            store,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl<T> RemoteCallInvoker<ApiRequest, T> for HttpApiClient
where
    T: DeserializeOwned + Send + 'static,
{
    async fn invoke(&self, payload: &ApiRequest) -> Result<CallResult<T>, RemoteCallError> {
        let url = resolve_url(&self.base_url, payload)?;
        debug!(method = %payload.method, %url, "sending remote call");

        let mut builder = self
            .client
            .request(payload.method.clone(), url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(access) = self.store.get(CredentialKind::Access) {
            builder = builder.bearer_auth(access.as_str());
        }
        if let Some(body) = &payload.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        decode_call_result(status.as_u16(), body.as_ref()).map_err(|reason| {
            RemoteCallError::decode(format!(
                "status {}: {reason}; body: {}",
                status.as_u16(),
                body_preview(body.as_ref())
            ))
        })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn resolve_url(base_url: &Url, request: &ApiRequest) -> Result<Url, RemoteCallError> {
    let relative = request.path.trim_start_matches('/');
    let mut url = base_url.join(relative).map_err(|error| {
        RemoteCallError::invalid_request(format!("invalid path `{}`: {error}", request.path))
    })?;

    if !request.query.is_empty() {
        url.query_pairs_mut().extend_pairs(request.query.iter());
    }
    if let Some(page) = request.page {
        page.apply_to(&mut url);
    }
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> RemoteCallError {
    if error.is_timeout() {
        RemoteCallError::timeout(error.to_string())
    } else {
        RemoteCallError::transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network request helpers.

    use super::*;
    use rstest::rstest;

    fn base(raw: &str) -> Url {
        with_trailing_slash(Url::parse(raw).expect("valid base url"))
    }

    #[rstest]
    #[case::bare_host("https://api.atelier.test", "https://api.atelier.test/api/dresses")]
    #[case::prefixed("https://api.atelier.test/v2", "https://api.atelier.test/v2/api/dresses")]
    #[case::slashed("https://api.atelier.test/v2/", "https://api.atelier.test/v2/api/dresses")]
    fn resolves_paths_under_the_base(#[case] raw_base: &str, #[case] expected: &str) {
        let url = resolve_url(&base(raw_base), &ApiRequest::get("/api/dresses")).expect("resolves");

        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn renders_query_then_page_window() {
        let request = ApiRequest::get("api/shops/9/dresses?pageIndex=4")
            .with_query("status", "available")
            .with_page(PageRequest {
                page_index: 1,
                page_size: 20,
            });

        let url = resolve_url(&base("https://api.atelier.test"), &request).expect("resolves");

        assert_eq!(url.path(), "/api/shops/9/dresses");
        assert_eq!(url.query(), Some("status=available&pageIndex=1&pageSize=20"));
    }

    #[test]
    fn post_carries_json_body() {
        let request = ApiRequest::post("api/orders", serde_json::json!({ "dressId": 42 }));

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(serde_json::json!({ "dressId": 42 })));
    }
}
