//! Authentication domain types

mod bootstrap;
mod types;

pub use bootstrap::{BootstrapOutcome, BootstrapState, GrantSource};
pub use types::{
    AuthGrant, DEFAULT_PASSWORD, SYNTHETIC_DOMAIN, Session, SyntheticIdentity, token_preview,
};
