//! Credential storage backed by one file per key in a private directory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{CredentialStorage, CredentialStorageError};

/// Stores each key as a file inside a capability-scoped directory.
///
/// # Examples
/// ```
/// use client::domain::ports::CredentialStorage;
/// use client::outbound::storage::FileCredentialStorage;
///
/// let temp = tempfile::tempdir()?;
/// let storage = FileCredentialStorage::open(temp.path().join("credentials"))?;
/// storage.write("accessToken", "eyJabc")?;
/// assert_eq!(storage.read("accessToken")?.as_deref(), Some("eyJabc"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct FileCredentialStorage {
    root: PathBuf,
    dir: Dir,
}

impl FileCredentialStorage {
    /// Open `root`, creating it (and its parents) when missing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
        debug!(path = %root.display(), "credential directory opened");
        Ok(Self { root, dir })
    }

    /// Directory holding the credential files.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn entry_name(key: &str) -> Result<&Path, CredentialStorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(Path::new(key))
    } else {
        Err(CredentialStorageError::unavailable(format!(
            "storage key `{key}` is not a plain file name"
        )))
    }
}

fn io_error(action: &str, key: &str, error: &io::Error) -> CredentialStorageError {
    CredentialStorageError::io(format!("{action} `{key}`: {error}"))
}

fn staging_name(key: &str) -> PathBuf {
    PathBuf::from(format!(".{key}.tmp"))
}

#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) {
    use cap_std::fs::OpenOptionsExt;

    options.mode(0o600);
}

#[cfg(not(unix))]
fn owner_only(_options: &mut OpenOptions) {}

/// Write `value` to a staging file created owner-only, then rename it over
/// `name` so readers never see a partial or wider-permission file.
fn replace_entry(dir: &Dir, name: &Path, staging: &Path, value: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    owner_only(&mut options);

    let mut file = dir.open_with(staging, &options)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    drop(file);
    dir.rename(staging, dir, name)
}

impl CredentialStorage for FileCredentialStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CredentialStorageError> {
        let name = entry_name(key)?;
        match self.dir.read_to_string(name) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error("read", key, &error)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CredentialStorageError> {
        let name = entry_name(key)?;
        let staging = staging_name(key);
        replace_entry(&self.dir, name, &staging, value).map_err(|error| {
            // Best effort; a leftover staging file is overwritten next time.
            let _ = self.dir.remove_file(&staging);
            io_error("write", key, &error)
        })
    }

    fn remove(&self, key: &str) -> Result<(), CredentialStorageError> {
        let name = entry_name(key)?;
        match self.dir.remove_file(name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error("remove", key, &error)),
        }
    }
}
