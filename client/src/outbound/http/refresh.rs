//! Reqwest-backed refresh adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::envelope::{RefreshBodyDto, decode_refresh_response};
use crate::domain::ports::{RefreshError, RefreshInvoker, RefreshRequest, RefreshResponse};

/// Refresh adapter POSTing the refresh credential to one endpoint.
pub struct HttpRefreshInvoker {
    client: Client,
    endpoint: Url,
}

impl HttpRefreshInvoker {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint refresh requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RefreshInvoker for HttpRefreshInvoker {
    async fn refresh(&self, request: &RefreshRequest) -> Result<RefreshResponse, RefreshError> {
        debug!(endpoint = %self.endpoint, "requesting credential refresh");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&RefreshBodyDto {
                refresh_token: request.refresh.as_str(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        // The body may carry credentials, so it is never echoed into errors.
        decode_refresh_response(status.as_u16(), body.as_ref())
            .map_err(|reason| RefreshError::decode(format!("status {}: {reason}", status.as_u16())))
    }
}

fn map_transport_error(error: reqwest::Error) -> RefreshError {
    if error.is_timeout() {
        RefreshError::timeout(error.to_string())
    } else {
        RefreshError::transport(error.to_string())
    }
}
