//! Session and identity types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::generate_tag;
use crate::response::Outcome;

/// Domain used for synthetic accounts.
pub const SYNTHETIC_DOMAIN: &str = "test.com";

/// Password used for synthetic accounts unless configured otherwise.
pub const DEFAULT_PASSWORD: &str = "password123";

/// An authenticated (subject, bearer token) pair.
///
/// Owned by the run that created it and never written anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    subject_id: String,
    access_token: String,
}

impl Session {
    /// Creates a session.
    pub fn new(subject_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Identifier of the authenticated user.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Bearer token to send on authenticated calls.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// A loggable prefix of the access token.
    #[must_use]
    pub fn token_preview(&self) -> String {
        token_preview(&self.access_token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("subject_id", &self.subject_id)
            .field("access_token", &self.token_preview())
            .finish()
    }
}

/// Get a preview of a secret (first 8 chars + ...).
#[must_use]
pub fn token_preview(token: &str) -> String {
    match token.char_indices().nth(8) {
        Some((cut, _)) if token.len() > 12 => format!("{}...", &token[..cut]),
        _ => token.to_string(),
    }
}

/// Credentials used to bootstrap a session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticIdentity {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl SyntheticIdentity {
    /// A fresh identity (`smoke_<tag>@test.com`) that cannot collide with a
    /// previous run.
    #[must_use]
    pub fn random() -> Self {
        Self {
            email: format!("smoke_{}@{SYNTHETIC_DOMAIN}", generate_tag()),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }

    /// A fixed identity. Reusing it across runs drives the login fallback.
    pub fn fixed(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// JSON credentials body shared by signup and password login.
    #[must_use]
    pub fn credentials(&self) -> Value {
        serde_json::json!({ "email": self.email, "password": self.password })
    }
}

impl fmt::Debug for SyntheticIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntheticIdentity")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The identity and token fields extracted from an authentication response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthGrant {
    /// User id, from `user.id` or a top-level `id`.
    pub subject_id: Option<String>,
    /// Session token, from `access_token`.
    pub access_token: Option<String>,
}

impl AuthGrant {
    /// Extracts the grant from a classified response.
    ///
    /// Non-success outcomes and non-object bodies yield an empty grant.
    #[must_use]
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let Some(body) = outcome.body().and_then(Value::as_object) else {
            return Self::default();
        };

        let subject_id = body
            .get("user")
            .and_then(|user| user.get("id"))
            .or_else(|| body.get("id"))
            .and_then(Value::as_str)
            .map(String::from);
        let access_token = body
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(String::from);

        Self {
            subject_id,
            access_token,
        }
    }

    /// Converts a complete grant into a session.
    #[must_use]
    pub fn into_session(self) -> Option<Session> {
        match (self.subject_id, self.access_token) {
            (Some(subject), Some(token)) => Some(Session::new(subject, token)),
            _ => None,
        }
    }
}
