//! Adapters implementing the application ports.

mod reqwest_gateway;

pub use reqwest_gateway::{GatewayError, ReqwestGateway};
