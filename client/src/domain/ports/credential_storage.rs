//! Driven port for durable client-local key/value storage of credentials.

use std::collections::HashMap;
use std::sync::Mutex;

use super::define_port_error;

define_port_error! {
    /// Failures raised by a storage engine.
    pub enum CredentialStorageError {
        /// Storage is disabled, locked or otherwise unusable.
        Unavailable { message: String } =>
            "credential storage unavailable: {message}",
        /// A read, write or delete failed.
        Io { message: String } =>
            "credential storage i/o failed: {message}",
    }
}

/// Port over the string entries the credential store persists.
///
/// Implementations only move strings; validating them is the store's job.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStorage: Send + Sync {
    /// Value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, CredentialStorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), CredentialStorageError>;

    /// Delete `key`. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), CredentialStorageError>;
}

/// Process-local storage, used when nothing should outlive the session.
///
/// # Examples
/// ```
/// use client::domain::ports::{CredentialStorage, InMemoryCredentialStorage};
///
/// let storage = InMemoryCredentialStorage::default();
/// storage.write("accessToken", "eyJabc")?;
/// assert_eq!(storage.read("accessToken")?.as_deref(), Some("eyJabc"));
/// storage.remove("accessToken")?;
/// assert!(storage.read("accessToken")?.is_none());
/// # Ok::<(), client::domain::ports::CredentialStorageError>(())
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCredentialStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryCredentialStorage {
    fn with_entries<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> R,
    ) -> Result<R, CredentialStorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CredentialStorageError::unavailable("in-memory storage lock poisoned"))?;
        Ok(f(&mut entries))
    }
}

impl CredentialStorage for InMemoryCredentialStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CredentialStorageError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CredentialStorageError> {
        self.with_entries(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), CredentialStorageError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}
