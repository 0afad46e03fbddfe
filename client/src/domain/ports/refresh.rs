//! Driven port exchanging a refresh credential for a new credential pair.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ApiStatus, Credential, CredentialPair};

/// Refresh request sent to the identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Credential being exchanged.
    pub refresh: Credential,
}

/// Refresh response as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshResponse {
    /// Envelope status.
    pub status: ApiStatus,
    /// Envelope message.
    pub message: String,
    /// Newly issued pair, when the backend sent one.
    pub pair: Option<CredentialPair>,
}

impl RefreshResponse {
    /// The new pair if and only if the refresh succeeded and carried one.
    pub fn into_renewed_pair(self) -> Option<CredentialPair> {
        if self.status.is_success() {
            self.pair
        } else {
            None
        }
    }
}

define_port_error! {
    /// Failures raised by the refresh adapter before a response was classified.
    pub enum RefreshError {
        /// The refresh request never produced a response.
        Transport { message: String } =>
            "credential refresh transport failed: {message}",
        /// The refresh request exceeded the configured timeout.
        Timeout { message: String } =>
            "credential refresh timed out: {message}",
        /// The refresh response was not a valid envelope or pair.
        Decode { message: String } =>
            "credential refresh response decode failed: {message}",
    }
}

/// Port minting a new credential pair from a refresh credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshInvoker: Send + Sync {
    /// Exchange `request.refresh` for a new pair.
    ///
    /// A rejected refresh credential is a normal response with a failure
    /// status, not an error.
    async fn refresh(&self, request: &RefreshRequest) -> Result<RefreshResponse, RefreshError>;
}

#[cfg(test)]
mod tests {
    //! Unit coverage for refresh response classification.

    use super::*;
    use rstest::rstest;

    fn pair() -> CredentialPair {
        CredentialPair::parse("eyJaccess", "eyJrefresh").expect("valid pair")
    }

    #[rstest]
    #[case::ok_with_pair(200, true, true)]
    #[case::ok_without_pair(200, false, false)]
    #[case::rejected_with_pair(401, true, false)]
    #[case::server_error(500, false, false)]
    fn renewed_pair_requires_success_and_payload(
        #[case] status: u16,
        #[case] with_pair: bool,
        #[case] renewed: bool,
    ) {
        let response = RefreshResponse {
            status: ApiStatus::new(status),
            message: String::new(),
            pair: with_pair.then(pair),
        };
        assert_eq!(response.into_renewed_pair().is_some(), renewed);
    }
}
