//! Validated access to the persisted credential pair.
//!
//! The store is built once per session and shared by `Arc` with everything
//! that needs credentials. Reads are self-healing: a stored value without the
//! token shape is deleted and reported as absent, so leftovers from an older
//! format are never sent to the backend. Storage engine failures are logged
//! and swallowed; the rest of the client keeps working as if logged out.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::CredentialStorage;
use crate::domain::{Credential, CredentialKind, CredentialPair};

/// Credential pair persisted through a [`CredentialStorage`] engine.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use client::domain::ports::{CredentialStorage, InMemoryCredentialStorage};
/// use client::domain::{CredentialKind, CredentialPair, CredentialStore};
///
/// let storage = Arc::new(InMemoryCredentialStorage::default());
/// storage.write("refreshToken", "legacy-session-id")?;
///
/// let store = CredentialStore::new(storage.clone());
/// assert!(store.get(CredentialKind::Refresh).is_none());
/// assert!(storage.read("refreshToken")?.is_none());
///
/// store.set(&CredentialPair::parse("eyJaccess", "eyJrefresh").expect("valid"));
/// assert!(store.pair().is_some());
/// # Ok::<(), client::domain::ports::CredentialStorageError>(())
/// ```
pub struct CredentialStore {
    storage: Arc<dyn CredentialStorage>,
}

impl CredentialStore {
    /// Wrap a storage engine.
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self { storage }
    }

    /// Stored credential of `kind`, if present and well-formed.
    ///
    /// Malformed entries are purged before returning `None`.
    pub fn get(&self, kind: CredentialKind) -> Option<Credential> {
        let key = kind.storage_key();
        let raw = match self.storage.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                warn!(key, error.kind = error.kind(), %error, "credential read failed");
                return None;
            }
        };

        match Credential::parse(raw) {
            Ok(credential) => Some(credential),
            Err(reason) => {
                warn!(key, %reason, "purging malformed stored credential");
                self.remove_entry(key);
                None
            }
        }
    }

    /// Both credentials, when both are present and well-formed.
    pub fn pair(&self) -> Option<CredentialPair> {
        let access = self.get(CredentialKind::Access)?;
        let refresh = self.get(CredentialKind::Refresh)?;
        Some(CredentialPair { access, refresh })
    }

    /// Overwrite both entries, access first.
    pub fn set(&self, pair: &CredentialPair) {
        for kind in [CredentialKind::Access, CredentialKind::Refresh] {
            let key = kind.storage_key();
            if let Err(error) = self.storage.write(key, pair.get(kind).as_str()) {
                warn!(key, error.kind = error.kind(), %error, "credential write failed");
            }
        }
        debug!(
            access_fp = %pair.access.fingerprint(),
            refresh_fp = %pair.refresh.fingerprint(),
            "credential pair stored"
        );
    }

    /// Remove both entries.
    pub fn clear(&self) {
        for kind in [CredentialKind::Access, CredentialKind::Refresh] {
            self.remove_entry(kind.storage_key());
        }
        debug!("credential pair cleared");
    }

    fn remove_entry(&self, key: &str) {
        if let Err(error) = self.storage.remove(key) {
            warn!(key, error.kind = error.kind(), %error, "credential delete failed");
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}
