//! Outbound adapters implementing the domain ports.
//!
//! - `http` speaks the marketplace backend's JSON envelope over reqwest.
//! - `storage` persists the credential pair in a capability-scoped directory.

pub mod http;
pub mod storage;
