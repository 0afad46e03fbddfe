//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `ATELIER_*` environment variables and configuration
//! files. Numeric settings carry loader defaults; the remaining fields are
//! optional and their accessors apply the defaults and validate the URLs.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{DEFAULT_EXPIRED_MARKER, ExpiredCredentialMarker};

const DEFAULT_REFRESH_PATH: &str = "/api/auth/refresh-token";
const DEFAULT_REQUEST_PATH: &str = "/api/dresses";
const CREDENTIALS_SUBDIR: [&str; 2] = ["atelier", "credentials"];

/// Problems found while interpreting [`ClientSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No base URL was configured.
    #[error("base URL is not configured; set ATELIER_BASE_URL")]
    MissingBaseUrl,
    /// A configured URL or path does not parse.
    #[error("invalid {field} `{value}`: {source}")]
    InvalidUrl {
        /// Setting that failed.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// No credentials directory was configured and the platform has no
    /// configuration directory.
    #[error("no configuration directory available; set ATELIER_CREDENTIALS_DIR")]
    NoCredentialsDir,
}

/// Configuration values for the marketplace client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ATELIER")]
pub struct ClientSettings {
    /// Backend base URL, e.g. `https://api.example.com`.
    pub base_url: Option<String>,
    /// Path of the credential refresh endpoint, relative to the base URL.
    pub refresh_path: Option<String>,
    /// Directory holding the persisted credential pair.
    pub credentials_dir: Option<PathBuf>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Message fragment identifying an expired access credential.
    pub expired_marker: Option<String>,
    /// Default request path for the command-line client.
    pub path: Option<String>,
    /// Page size requested by list calls.
    #[ortho_config(default = 20)]
    pub page_size: u32,
}

impl ClientSettings {
    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingBaseUrl`] when unset and
    /// [`SettingsError::InvalidUrl`] when it does not parse.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(SettingsError::MissingBaseUrl)?;
        Url::parse(raw).map_err(|source| SettingsError::InvalidUrl {
            field: "base_url",
            value: raw.to_owned(),
            source,
        })
    }

    /// Configured refresh path, falling back to the default.
    pub fn refresh_path(&self) -> &str {
        self.refresh_path.as_deref().unwrap_or(DEFAULT_REFRESH_PATH)
    }

    /// Absolute refresh endpoint under the base URL.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::base_url`], or
    /// [`SettingsError::InvalidUrl`] when the path cannot be joined.
    pub fn refresh_endpoint(&self) -> Result<Url, SettingsError> {
        let mut base = self.base_url()?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let relative = self.refresh_path().trim_start_matches('/');
        base.join(relative).map_err(|source| SettingsError::InvalidUrl {
            field: "refresh_path",
            value: self.refresh_path().to_owned(),
            source,
        })
    }

    /// Configured credentials directory, falling back to
    /// `<config dir>/atelier/credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoCredentialsDir`] when neither is available.
    pub fn credentials_dir(&self) -> Result<PathBuf, SettingsError> {
        if let Some(dir) = &self.credentials_dir {
            return Ok(dir.clone());
        }
        let base = dirs::config_dir().ok_or(SettingsError::NoCredentialsDir)?;
        Ok(CREDENTIALS_SUBDIR
            .iter()
            .fold(base, |path, segment| path.join(segment)))
    }

    /// Per-request timeout, at least one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Expired-credential marker; blank values fall back to the default.
    pub fn expired_marker(&self) -> ExpiredCredentialMarker {
        ExpiredCredentialMarker::new(
            self.expired_marker
                .as_deref()
                .unwrap_or(DEFAULT_EXPIRED_MARKER),
        )
    }

    /// Default request path for the command-line client.
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_REQUEST_PATH)
    }

    /// Page size for list calls, at least one.
    pub fn page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}
