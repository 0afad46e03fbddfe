//! Client core of the bridal marketplace.
//!
//! Runs authenticated backend calls with one transparent credential refresh,
//! keeps the credential pair in validated durable storage, and tracks list
//! pagination and task state for whatever front end sits on top.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
