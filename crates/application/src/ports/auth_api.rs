//! Authentication API port

use async_trait::async_trait;
use pulse_domain::{Outcome, Session, SyntheticIdentity};

/// The authentication operations the bootstrapper relies on.
///
/// Kept separate from [`super::Gateway`] so every bootstrap branch can be
/// driven by a scripted backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Creates an account. May return a session, a bare user, or a 400/422
    /// expected error.
    async fn sign_up(&self, identity: &SyntheticIdentity) -> Outcome;

    /// Password-grant login.
    async fn sign_in(&self, identity: &SyntheticIdentity) -> Outcome;

    /// Revokes the session's refresh tokens.
    async fn sign_out(&self, session: &Session) -> Outcome;
}
