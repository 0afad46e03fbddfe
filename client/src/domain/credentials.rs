//! Access and refresh credentials.
//!
//! A [`Credential`] can only be built from a string carrying the encoded-token
//! marker prefix, so a value that reaches the backend has at least the shape
//! of a token the identity service issued. The secret is zeroised on drop and
//! never printed by `Debug`.

use std::fmt;

use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

/// Prefix every issued token starts with (base64 of `{"`).
pub const CREDENTIAL_PREFIX: &str = "eyJ";

/// Storage key for the access credential.
pub const ACCESS_CREDENTIAL_KEY: &str = "accessToken";

/// Storage key for the refresh credential.
pub const REFRESH_CREDENTIAL_KEY: &str = "refreshToken";

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 6;

/// Which half of the credential pair is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// Short-lived credential authorising API calls.
    Access,
    /// Longer-lived credential used to mint a new pair.
    Refresh,
}

impl CredentialKind {
    /// Fixed key under which this credential is persisted.
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Access => ACCESS_CREDENTIAL_KEY,
            Self::Refresh => REFRESH_CREDENTIAL_KEY,
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Reasons a raw string was refused as a credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialFormatError {
    /// Value is empty.
    #[error("credential must not be empty")]
    Empty,
    /// Value does not start with the encoded-token marker.
    #[error("credential does not start with the `{CREDENTIAL_PREFIX}` token marker")]
    MissingPrefix,
}

/// Structurally valid token string.
///
/// # Examples
/// ```
/// use client::domain::Credential;
///
/// let credential = Credential::parse("eyJhbGciOiJIUzI1NiJ9.e30.c2ln").expect("token shape");
/// assert_eq!(credential.fingerprint().len(), 12);
/// assert!(Credential::parse("leftover-session-id").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Validate `raw` and wrap it.
    ///
    /// The value is checked as given; whitespace before the marker is a
    /// format error.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialFormatError`] when the value is blank or lacks the
    /// token marker.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CredentialFormatError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(CredentialFormatError::Empty);
        }
        if !raw.starts_with(CREDENTIAL_PREFIX) {
            return Err(CredentialFormatError::MissingPrefix);
        }
        Ok(Self(raw))
    }

    /// Borrow the token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Truncated SHA-256 of the token, safe to log for correlation.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential")
            .field(&format_args!("fp:{}", self.fingerprint()))
            .finish()
    }
}

/// Access and refresh credential treated as one unit of session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    /// Credential sent as the bearer token.
    pub access: Credential,
    /// Credential exchanged for a new pair.
    pub refresh: Credential,
}

impl CredentialPair {
    /// Validate and pair two raw token strings.
    ///
    /// # Errors
    ///
    /// Returns the first [`CredentialFormatError`] encountered.
    pub fn parse(
        access: impl Into<String>,
        refresh: impl Into<String>,
    ) -> Result<Self, CredentialFormatError> {
        Ok(Self {
            access: Credential::parse(access)?,
            refresh: Credential::parse(refresh)?,
        })
    }

    /// Credential of the requested kind.
    pub fn get(&self, kind: CredentialKind) -> &Credential {
        match kind {
            CredentialKind::Access => &self.access,
            CredentialKind::Refresh => &self.refresh,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for credential validation.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", CredentialFormatError::Empty)]
    #[case::blank("   ", CredentialFormatError::MissingPrefix)]
    #[case::leading_space("  eyJabc", CredentialFormatError::MissingPrefix)]
    #[case::leading_newline("\neyJabc", CredentialFormatError::MissingPrefix)]
    #[case::opaque("s3ss10n", CredentialFormatError::MissingPrefix)]
    #[case::lowercase("eyj.payload", CredentialFormatError::MissingPrefix)]
    #[case::quoted("\"eyJabc\"", CredentialFormatError::MissingPrefix)]
    fn rejects_values_without_token_shape(
        #[case] raw: &str,
        #[case] expected: CredentialFormatError,
    ) {
        assert_eq!(Credential::parse(raw), Err(expected));
    }

    #[rstest]
    fn keeps_the_value_verbatim() {
        let credential = Credential::parse("eyJabc.def").expect("valid");
        assert_eq!(credential.as_str(), "eyJabc.def");
    }

    #[rstest]
    fn debug_output_hides_the_secret() {
        let credential = Credential::parse("eyJsecret-material").expect("valid");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("secret-material"), "{rendered}");
        assert!(rendered.starts_with("Credential(fp:"));
    }

    #[rstest]
    fn fingerprints_distinguish_tokens() {
        let first = Credential::parse("eyJfirst").expect("valid");
        let second = Credential::parse("eyJsecond").expect("valid");
        assert_ne!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.fingerprint(), first.clone().fingerprint());
        assert!(first.fingerprint().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[rstest]
    fn pair_parse_reports_the_first_bad_half() {
        let error = CredentialPair::parse("eyJaccess", "opaque").expect_err("refresh invalid");
        assert_eq!(error, CredentialFormatError::MissingPrefix);

        let pair = CredentialPair::parse("eyJaccess", "eyJrefresh").expect("both valid");
        assert_eq!(pair.get(CredentialKind::Refresh).as_str(), "eyJrefresh");
        assert_eq!(CredentialKind::Access.storage_key(), "accessToken");
    }
}
