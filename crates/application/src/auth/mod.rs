//! Authentication API client.
//!
//! This module provides the gateway-backed [`crate::ports::AuthApi`]
//! implementation used by the bootstrapper and the session teardown.

mod gateway_auth;

pub use gateway_auth::{GatewayAuthApi, LOGOUT_PATH, SIGNUP_PATH, TOKEN_PATH};
