//! Driving port for issuing one call against the marketplace backend.
//!
//! The invoker is supplied by the caller and knows nothing about credential
//! refresh. Application-level failures (4xx/5xx envelopes) come back as
//! [`CallResult::Failure`]; only transport problems are errors.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::CallResult;

define_port_error! {
    /// Transport-level failures raised while performing a remote call.
    pub enum RemoteCallError {
        /// The request never produced a response.
        Transport { message: String } =>
            "remote call transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "remote call timed out: {message}",
        /// The response body was not a valid envelope.
        Decode { message: String } =>
            "remote call response decode failed: {message}",
        /// The request could not be built.
        InvalidRequest { message: String } =>
            "remote call request invalid: {message}",
    }
}

/// Port performing exactly one network call per invocation.
///
/// `P` is the request payload, `T` the item type the caller expects back.
#[async_trait]
pub trait RemoteCallInvoker<P, T>: Send + Sync
where
    P: Sync + 'static,
    T: Send + 'static,
{
    /// Issue the call described by `payload`.
    async fn invoke(&self, payload: &P) -> Result<CallResult<T>, RemoteCallError>;
}
