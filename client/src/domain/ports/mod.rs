//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the client core talks to the outside: the backend call
//! it was asked to make, the identity endpoint that refreshes credentials and
//! the local storage engine holding them. Each port exposes a typed error so
//! adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_storage;
mod refresh;
mod remote_call;

#[cfg(test)]
pub use credential_storage::MockCredentialStorage;
pub use credential_storage::{
    CredentialStorage, CredentialStorageError, InMemoryCredentialStorage,
};
#[cfg(test)]
pub use refresh::MockRefreshInvoker;
pub use refresh::{RefreshError, RefreshInvoker, RefreshRequest, RefreshResponse};
pub use remote_call::{RemoteCallError, RemoteCallInvoker};
