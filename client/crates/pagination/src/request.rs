//! Page selection sent with list requests.

use serde::{Deserialize, Serialize};
use url::Url;

/// Query parameter carrying the page index.
pub const PAGE_INDEX_PARAM: &str = "pageIndex";
/// Query parameter carrying the page size.
pub const PAGE_SIZE_PARAM: &str = "pageSize";

/// Page a view wants the backend to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Requested page index.
    pub page_index: u32,
    /// Requested page size.
    pub page_size: u32,
}

impl PageRequest {
    /// Query pairs in the order the backend documents them.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            (PAGE_INDEX_PARAM, self.page_index.to_string()),
            (PAGE_SIZE_PARAM, self.page_size.to_string()),
        ]
    }

    /// Append the page selection to `url`, replacing any earlier selection.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    /// use url::Url;
    ///
    /// let mut url = Url::parse("https://api.example.test/dresses?color=ivory&pageIndex=9")
    ///     .expect("valid url");
    /// PageRequest { page_index: 2, page_size: 12 }.apply_to(&mut url);
    /// assert_eq!(url.query(), Some("color=ivory&pageIndex=2&pageSize=12"));
    /// ```
    pub fn apply_to(&self, url: &mut Url) {
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != PAGE_INDEX_PARAM && key != PAGE_SIZE_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        for (key, value) in self.query_pairs() {
            pairs.append_pair(key, &value);
        }
    }
}
