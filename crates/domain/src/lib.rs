//! Pulse Domain - Core verification types
//!
//! This crate defines the domain model for the Pulse backend verification
//! harness. All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod id;
pub mod record;
pub mod request;
pub mod response;
pub mod settings;
pub mod testing;
pub mod tls;

pub use auth::{
    AuthGrant, BootstrapOutcome, BootstrapState, GrantSource, Session, SyntheticIdentity,
};
pub use error::{DomainError, DomainResult};
pub use id::{generate_id, generate_tag};
pub use record::{CREATED_NAME, ClientRecord, UPDATED_NAME};
pub use request::{ApiFamily, EndpointRef, HttpMethod};
pub use response::{Outcome, StatusCode};
pub use settings::{GatewayConfig, IdentityMode, SuiteConfig};
pub use testing::{AbortReason, RunReport, RunVerdict, Step, StepReport, VerifyFailure};
pub use tls::{TlsPolicy, TlsSecurityWarning};
