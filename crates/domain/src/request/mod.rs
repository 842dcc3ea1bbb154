//! Request-side domain types.

mod endpoint;
mod method;

pub use endpoint::{AUTH_PREFIX, ApiFamily, EndpointRef, REST_BASE_PATH};
pub use method::HttpMethod;
