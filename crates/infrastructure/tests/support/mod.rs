//! Shared helpers for the infrastructure integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod mock_backend;

pub use mock_backend::{AuthMode, MockBackend, MockOptions, RecordedRequest};
