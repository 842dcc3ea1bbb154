//! Pulse Application - Verification use cases
//!
//! This crate holds the ports the harness talks to the backend through and
//! the use cases that drive a verification run: connectivity probe, session
//! bootstrap, resource CRUD verification, access probe and teardown.

pub mod auth;
pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod fakes;

pub use auth::GatewayAuthApi;
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{AuthApi, Gateway};
pub use use_cases::{
    BootstrapReport, BootstrapSession, EndSession, ProbeAccess, ProbeConnectivity,
    ResourceVerification, RunSuite, VerifyResource,
};
