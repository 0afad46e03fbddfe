//! Domain primitives and services of the marketplace client core.
//!
//! Purpose: model the credential pair, classify remote call outcomes and run
//! authenticated calls with a single transparent refresh. Nothing here knows
//! about HTTP or the filesystem; adapters live under `outbound`.
//!
//! Public surface:
//! - CredentialStore — validated, self-purging access to the stored pair.
//! - AuthenticatedRequestExecutor — call, refresh on expiry, retry once.
//! - CallResult — item, list or failure outcome of one call.
//! - TaskTracker — observable idle/in-flight/done/failed state.

pub mod ports;

mod auth_executor;
mod call_result;
mod credential_store;
mod credentials;
mod task_state;

pub use self::auth_executor::{AuthenticatedRequestExecutor, ExecuteError};
pub use self::call_result::{
    ApiStatus, CallResult, DEFAULT_EXPIRED_MARKER, ExpiredCredentialMarker,
};
pub use self::credential_store::CredentialStore;
pub use self::credentials::{
    ACCESS_CREDENTIAL_KEY, CREDENTIAL_PREFIX, Credential, CredentialFormatError, CredentialKind,
    CredentialPair, REFRESH_CREDENTIAL_KEY,
};
pub use self::task_state::{TaskState, TaskTracker};
