//! Page cursor as returned by list endpoints.

use serde::{Deserialize, Serialize};

/// Numbering scheme used by one family of list endpoints.
///
/// Every endpoint family numbers its pages consistently, either from zero or
/// from one. The base is fixed when a [`crate::PaginationState`] is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// Pages are numbered `0..total_pages`.
    #[default]
    Zero,
    /// Pages are numbered `1..=total_pages`.
    One,
}

impl IndexBase {
    /// Index of the first page under this scheme.
    ///
    /// # Examples
    /// ```
    /// use pagination::IndexBase;
    ///
    /// assert_eq!(IndexBase::Zero.first(), 0);
    /// assert_eq!(IndexBase::One.first(), 1);
    /// ```
    #[must_use]
    pub const fn first(self) -> u32 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    /// Index of the last page for `total_pages`, or `None` when there are no
    /// pages at all.
    #[must_use]
    pub const fn last(self, total_pages: u32) -> Option<u32> {
        if total_pages == 0 {
            return None;
        }
        // `total_pages >= 1`, so the subtraction cannot wrap.
        Some(self.first() + (total_pages - 1))
    }

    /// Whether `index` addresses an existing page.
    #[must_use]
    pub const fn contains(self, index: u32, total_pages: u32) -> bool {
        match self.last(total_pages) {
            Some(last) => index >= self.first() && index <= last,
            None => false,
        }
    }
}

/// Page window reported by the backend for one list response.
///
/// `has_next_page` and `has_prev_page` are whatever the server said; they are
/// never derived locally, so the displayed state cannot drift from the last
/// response.
///
/// # Examples
/// ```
/// use pagination::PageCursor;
///
/// let cursor: PageCursor = serde_json::from_str(
///     r#"{"pageIndex":0,"pageSize":20,"totalItems":41,"totalPages":3,
///         "hasNextPage":true,"hasPrevPage":false}"#,
/// )
/// .expect("valid cursor");
/// assert_eq!(cursor.total_pages, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
    /// Index of the page the items belong to.
    pub page_index: u32,
    /// Number of items requested per page.
    pub page_size: u32,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total_items: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Whether the server reports a following page.
    #[serde(default)]
    pub has_next_page: bool,
    /// Whether the server reports a preceding page.
    #[serde(default)]
    pub has_prev_page: bool,
}

impl PageCursor {
    /// Initial cursor before any list response arrived.
    #[must_use]
    pub const fn empty(base: IndexBase, page_size: u32) -> Self {
        Self {
            page_index: base.first(),
            page_size,
            total_items: 0,
            total_pages: 0,
            has_next_page: false,
            has_prev_page: false,
        }
    }
}
