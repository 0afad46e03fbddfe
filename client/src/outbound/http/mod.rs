//! Reqwest adapters for the marketplace backend.
//!
//! Both adapters share the backend's response envelope: a JSON object with a
//! `statusCode`, a human-readable `message` and either an `item` or a page of
//! `items` alongside the cursor fields.

mod api_client;
mod envelope;
mod refresh;

pub use api_client::{ApiRequest, HttpApiClient};
pub use refresh::HttpRefreshInvoker;
