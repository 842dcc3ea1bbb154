//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the verification logic and the
//! backend. Each port is a trait implemented by an adapter in the
//! infrastructure layer, or by a scripted fake in tests.

mod auth_api;
mod gateway;

pub use auth_api::AuthApi;
pub use gateway::Gateway;
