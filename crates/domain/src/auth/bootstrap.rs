//! Session bootstrap state machine.
//!
//! ```text
//! Created ──signup──▶ SignupAttempted ─┬─ identity + token ──▶ Authenticated
//!                                      ├─ identity, no token ─▶ ConfirmationRequired
//!                                      └─ otherwise ──login──▶ LoginAttempted ─┬─ token ─▶ Authenticated
//!                                                                              └─ else ──▶ AuthFailed
//! ```
//!
//! Transitions are pure; the caller performs the signup and login calls and
//! feeds their outcomes in.

use serde::{Deserialize, Serialize};

use super::{AuthGrant, Session};
use crate::response::Outcome;
use crate::testing::AbortReason;

/// Terminal result of a bootstrap attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A usable session was obtained.
    Authenticated(Session),
    /// The account exists but must be confirmed out of band before a session
    /// can be issued. Not an error; the run cannot continue automatically.
    ConfirmationRequired {
        /// Id of the unconfirmed user.
        subject_id: String,
    },
    /// Neither signup nor login produced a session.
    AuthFailed {
        /// Human-readable description of the last failure.
        reason: String,
    },
}

impl BootstrapOutcome {
    /// The session, if authenticated.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Why a run must stop, if it must.
    #[must_use]
    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self {
            Self::Authenticated(_) => None,
            Self::ConfirmationRequired { subject_id } => Some(AbortReason::ConfirmationRequired {
                subject_id: subject_id.clone(),
            }),
            Self::AuthFailed { .. } => Some(AbortReason::AuthFailed),
        }
    }
}

/// Which credential path produced the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantSource {
    /// Signup returned a session directly.
    Signup,
    /// Password-grant login after signup did not yield a session.
    Login,
}

/// States of the bootstrap machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
    /// Nothing attempted yet.
    Created,
    /// Signup did not yield a session; login must be attempted next.
    SignupFailed {
        /// Description of the signup outcome.
        reason: String,
    },
    /// A terminal state was reached.
    Finished {
        /// The final outcome.
        outcome: BootstrapOutcome,
        /// Path that produced it, when authenticated.
        source: Option<GrantSource>,
    },
}

impl BootstrapState {
    /// Applies the signup outcome to a `Created` machine.
    #[must_use]
    pub fn after_signup(signup: &Outcome) -> Self {
        let grant = AuthGrant::from_outcome(signup);
        match (grant.subject_id, grant.access_token) {
            (Some(subject), Some(token)) => Self::Finished {
                outcome: BootstrapOutcome::Authenticated(Session::new(subject, token)),
                source: Some(GrantSource::Signup),
            },
            (Some(subject_id), None) => Self::Finished {
                outcome: BootstrapOutcome::ConfirmationRequired { subject_id },
                source: None,
            },
            _ => Self::SignupFailed {
                reason: format!("signup: {signup}"),
            },
        }
    }

    /// Applies the login outcome to a `SignupFailed` machine.
    #[must_use]
    pub fn after_login(self, login: &Outcome) -> Self {
        if let Self::Finished { .. } = self {
            return self;
        }
        match AuthGrant::from_outcome(login).into_session() {
            Some(session) => Self::Finished {
                outcome: BootstrapOutcome::Authenticated(session),
                source: Some(GrantSource::Login),
            },
            None => {
                let signup = match self {
                    Self::SignupFailed { reason } => format!("{reason}; "),
                    _ => String::new(),
                };
                Self::Finished {
                    outcome: BootstrapOutcome::AuthFailed {
                        reason: format!("{signup}login: {login}"),
                    },
                    source: None,
                }
            }
        }
    }

    /// Returns true once a terminal state is reached.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}
