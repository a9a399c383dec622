//! Signing, paginating proxy between a transaction dashboard and the YaYa
//! Wallet transaction API.

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
