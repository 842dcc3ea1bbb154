//! Pulse Infrastructure - Adapters and implementations
//!
//! This crate provides the reqwest-backed request gateway and the layered
//! settings loader.

pub mod adapters;
pub mod settings;

pub use adapters::{GatewayError, ReqwestGateway};
pub use settings::{ConfigError, Settings, SettingsOverrides};
