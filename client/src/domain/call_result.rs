//! Outcome of one remote call, as classified by the client core.
//!
//! The backend wraps every response in an envelope carrying its own status
//! code and a human-readable message. The adapters decode that envelope into
//! one of three explicit variants so callers never have to probe optional
//! fields to learn what came back.

use std::fmt;

use pagination::Page;

/// Substring the backend puts in the message of a 401 caused by an expired
/// access credential ("Token đã hết hạn.").
pub const DEFAULT_EXPIRED_MARKER: &str = "hết hạn";

/// Status code reported in a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiStatus(u16);

impl ApiStatus {
    /// `200 OK`.
    pub const OK: Self = Self(200);
    /// `401 Unauthorized`.
    pub const UNAUTHORIZED: Self = Self(401);

    /// Wrap a raw status code.
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Raw status code.
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Whether the status belongs to the success family (`200..=204`).
    ///
    /// # Examples
    /// ```
    /// use client::domain::ApiStatus;
    ///
    /// assert!(ApiStatus::new(204).is_success());
    /// assert!(!ApiStatus::new(206).is_success());
    /// ```
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 <= 204
    }

    /// Whether the status is `401`.
    pub const fn is_unauthorized(self) -> bool {
        self.0 == Self::UNAUTHORIZED.0
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ApiStatus {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Message fragment identifying an expired access credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredCredentialMarker(String);

impl ExpiredCredentialMarker {
    /// Use `fragment` as the marker. A blank fragment falls back to
    /// [`DEFAULT_EXPIRED_MARKER`], since an empty substring would match every
    /// 401.
    pub fn new(fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        if fragment.trim().is_empty() {
            return Self::default();
        }
        Self(fragment)
    }

    /// Marker text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether a `status`/`message` combination signals an expired credential.
    pub fn matches(&self, status: ApiStatus, message: &str) -> bool {
        status.is_unauthorized() && message.contains(self.0.as_str())
    }
}

impl Default for ExpiredCredentialMarker {
    fn default() -> Self {
        Self(DEFAULT_EXPIRED_MARKER.to_owned())
    }
}

/// Classified result of one remote call.
///
/// # Examples
/// ```
/// use client::domain::{ApiStatus, CallResult, ExpiredCredentialMarker};
///
/// let expired: CallResult<()> =
///     CallResult::failure(ApiStatus::UNAUTHORIZED, "Token đã hết hạn.");
/// assert!(expired.is_credential_expired(&ExpiredCredentialMarker::default()));
///
/// let denied: CallResult<()> = CallResult::failure(ApiStatus::UNAUTHORIZED, "Sai mật khẩu");
/// assert!(!denied.is_credential_expired(&ExpiredCredentialMarker::default()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult<T> {
    /// Success carrying at most one item.
    Item {
        /// Envelope status.
        status: ApiStatus,
        /// Envelope message.
        message: String,
        /// Returned item, if the endpoint sends one.
        item: Option<T>,
    },
    /// Success carrying a page of items.
    List {
        /// Envelope status.
        status: ApiStatus,
        /// Envelope message.
        message: String,
        /// Items with their page cursor.
        page: Page<T>,
    },
    /// Application-level failure.
    Failure {
        /// Envelope status.
        status: ApiStatus,
        /// Envelope message.
        message: String,
    },
}

impl<T> CallResult<T> {
    /// Success with one item.
    pub fn item(status: ApiStatus, message: impl Into<String>, item: Option<T>) -> Self {
        Self::Item {
            status,
            message: message.into(),
            item,
        }
    }

    /// Success with a page of items.
    pub fn list(status: ApiStatus, message: impl Into<String>, page: Page<T>) -> Self {
        Self::List {
            status,
            message: message.into(),
            page,
        }
    }

    /// Application-level failure.
    pub fn failure(status: ApiStatus, message: impl Into<String>) -> Self {
        Self::Failure {
            status,
            message: message.into(),
        }
    }

    /// Envelope status of any variant.
    pub const fn status(&self) -> ApiStatus {
        match self {
            Self::Item { status, .. } | Self::List { status, .. } | Self::Failure { status, .. } => {
                *status
            }
        }
    }

    /// Envelope message of any variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Item { message, .. }
            | Self::List { message, .. }
            | Self::Failure { message, .. } => message.as_str(),
        }
    }

    /// Whether the status is in the success family.
    pub const fn is_success(&self) -> bool {
        self.status().is_success()
    }

    /// Whether this is the expired-credential condition.
    pub fn is_credential_expired(&self, marker: &ExpiredCredentialMarker) -> bool {
        marker.matches(self.status(), self.message())
    }

    /// Item of a single-item success, if any.
    pub fn into_item(self) -> Option<T> {
        match self {
            Self::Item { item, .. } => item,
            Self::List { .. } | Self::Failure { .. } => None,
        }
    }

    /// Page of a list success, if any.
    pub fn into_page(self) -> Option<Page<T>> {
        match self {
            Self::List { page, .. } => Some(page),
            Self::Item { .. } | Self::Failure { .. } => None,
        }
    }
}
