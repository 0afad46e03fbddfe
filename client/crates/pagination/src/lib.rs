//! Pagination primitives shared by marketplace list views.
//!
//! The backend returns list results together with a page cursor. This crate
//! owns the cursor wire shape ([`PageCursor`]), the list half of a response
//! ([`Page`]), the query parameters a view attaches to the next fetch
//! ([`PageRequest`]) and the client-side navigation state
//! ([`PaginationState`]).
//!
//! Navigation never fetches anything. Views observe the page index and issue
//! a new list request whenever it changes, then feed the server's cursor back
//! through [`PaginationState::set_paging`].

mod cursor;
mod navigation;
mod page;
mod request;

pub use cursor::{IndexBase, PageCursor};
pub use navigation::{PageNavigationError, PaginationState};
pub use page::Page;
pub use request::{PAGE_INDEX_PARAM, PAGE_SIZE_PARAM, PageRequest};
