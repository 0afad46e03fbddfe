//! List payload with its page cursor.

use serde::{Deserialize, Serialize};

use crate::PageCursor;

/// Items of one list response together with the cursor describing them.
///
/// On the wire the cursor fields sit next to `items`:
///
/// ```
/// use pagination::Page;
///
/// let page: Page<String> = serde_json::from_str(
///     r#"{"items":["ivory","champagne"],"pageIndex":0,"pageSize":2,
///         "totalItems":2,"totalPages":1,"hasNextPage":false,"hasPrevPage":false}"#,
/// )
/// .expect("valid page");
/// assert_eq!(page.items.len(), 2);
/// assert_eq!(page.cursor.total_pages, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Window the items belong to.
    #[serde(flatten)]
    pub cursor: PageCursor,
}
