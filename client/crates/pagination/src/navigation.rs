//! Client-side page navigation state for one list view.

use thiserror::Error;

use crate::{IndexBase, PageCursor, PageRequest};

/// Reasons a navigation request left the page index untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageNavigationError {
    /// The requested page lies outside the current page window.
    #[error("page {requested} is outside the {total_pages} available pages")]
    OutOfRange {
        /// Page index that was requested.
        requested: u32,
        /// Total pages reported by the last response.
        total_pages: u32,
    },
    /// Already on the last page.
    #[error("no page follows page {current}")]
    NoNextPage {
        /// Page index at the time of the request.
        current: u32,
    },
    /// Already on the first page.
    #[error("no page precedes page {current}")]
    NoPreviousPage {
        /// Page index at the time of the request.
        current: u32,
    },
}

/// Page window owned by a list view.
///
/// The cursor is replaced wholesale from each list response. Navigation only
/// moves `page_index` inside the reported window; the owning view is expected
/// to re-issue its list request whenever the index changes.
///
/// # Examples
/// ```
/// use pagination::{IndexBase, PageCursor, PaginationState};
///
/// let mut state = PaginationState::new(IndexBase::Zero, 20);
/// state.set_paging(PageCursor {
///     page_index: 0,
///     page_size: 20,
///     total_items: 45,
///     total_pages: 3,
///     has_next_page: true,
///     has_prev_page: false,
/// });
/// assert_eq!(state.go_next(), Ok(1));
/// assert!(state.goto_page(7).is_err());
/// assert_eq!(state.page_index(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    base: IndexBase,
    page_size: u32,
    cursor: PageCursor,
}

impl PaginationState {
    /// Create an empty state for an endpoint family numbered by `base`.
    #[must_use]
    pub const fn new(base: IndexBase, page_size: u32) -> Self {
        Self {
            base,
            page_size,
            cursor: PageCursor::empty(base, page_size),
        }
    }

    /// Numbering scheme of the endpoint family.
    #[must_use]
    pub const fn base(&self) -> IndexBase {
        self.base
    }

    /// Last cursor applied, with any local navigation folded in.
    #[must_use]
    pub const fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Current page index.
    #[must_use]
    pub const fn page_index(&self) -> u32 {
        self.cursor.page_index
    }

    /// Replace the cursor with the one reported by the latest list response.
    pub fn set_paging(&mut self, cursor: PageCursor) {
        self.cursor = cursor;
    }

    /// Move to the following page.
    ///
    /// # Errors
    ///
    /// Returns [`PageNavigationError::NoNextPage`] when already on the last
    /// page (or when no pages are known).
    pub fn go_next(&mut self) -> Result<u32, PageNavigationError> {
        let current = self.cursor.page_index;
        let next = current
            .checked_add(1)
            .filter(|next| self.base.contains(*next, self.cursor.total_pages))
            .ok_or(PageNavigationError::NoNextPage { current })?;
        self.cursor.page_index = next;
        Ok(next)
    }

    /// Move to the preceding page.
    ///
    /// # Errors
    ///
    /// Returns [`PageNavigationError::NoPreviousPage`] when already on the
    /// first page (or when no pages are known).
    pub fn go_previous(&mut self) -> Result<u32, PageNavigationError> {
        let current = self.cursor.page_index;
        let previous = current
            .checked_sub(1)
            .filter(|previous| self.base.contains(*previous, self.cursor.total_pages))
            .ok_or(PageNavigationError::NoPreviousPage { current })?;
        self.cursor.page_index = previous;
        Ok(previous)
    }

    /// Jump to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`PageNavigationError::OutOfRange`] when `target` is outside
    /// the reported window; the index is left unchanged.
    pub fn goto_page(&mut self, target: u32) -> Result<u32, PageNavigationError> {
        if !self.base.contains(target, self.cursor.total_pages) {
            return Err(PageNavigationError::OutOfRange {
                requested: target,
                total_pages: self.cursor.total_pages,
            });
        }
        self.cursor.page_index = target;
        Ok(target)
    }

    /// Drop the known window, e.g. after a filter or sort change.
    pub fn reset_paging(&mut self) {
        self.cursor = PageCursor::empty(self.base, self.page_size);
    }

    /// Query parameters for fetching the current page.
    #[must_use]
    pub const fn page_request(&self) -> PageRequest {
        PageRequest {
            page_index: self.cursor.page_index,
            page_size: self.page_size,
        }
    }
}
