//! Session bootstrap use case

use std::time::Instant;

use pulse_domain::{
    BootstrapOutcome, BootstrapState, GrantSource, Step, StepReport, SyntheticIdentity,
};
use tracing::{debug, info, warn};

use super::elapsed_ms;
use crate::ports::AuthApi;

/// Result of driving the bootstrap state machine to a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Terminal outcome.
    pub outcome: BootstrapOutcome,
    /// Path that produced the session, when authenticated.
    pub source: Option<GrantSource>,
    /// Email the attempt was made with.
    pub email: String,
    /// Wall time in milliseconds.
    pub duration_ms: u64,
}

impl BootstrapReport {
    /// Converts the outcome into the authentication step of a run.
    #[must_use]
    pub fn step_report(&self) -> StepReport {
        let report = match &self.outcome {
            BootstrapOutcome::Authenticated(session) => {
                let via = match self.source {
                    Some(GrantSource::Login) => "logged in",
                    Some(GrantSource::Signup) | None => "signed up",
                };
                StepReport::pass_with_value(
                    Step::Authentication,
                    format!("{via} as {} (user {})", self.email, session.subject_id()),
                )
            }
            BootstrapOutcome::ConfirmationRequired { subject_id } => StepReport::fail_with_value(
                Step::Authentication,
                format!("user {subject_id}"),
                "signup succeeded but no session was returned; email confirmation required",
            ),
            BootstrapOutcome::AuthFailed { reason } => {
                StepReport::fail(Step::Authentication, reason.clone())
            }
        };
        report.with_duration_ms(self.duration_ms)
    }
}

/// Obtains a session: signup first, password login as fallback.
///
/// An account that needs out-of-band confirmation stops the machine; logging
/// in with unconfirmed credentials is never attempted.
pub struct BootstrapSession<'a, A> {
    api: &'a A,
}

impl<'a, A: AuthApi> BootstrapSession<'a, A> {
    /// Creates a new `BootstrapSession` use case.
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Runs the state machine for `identity`.
    pub async fn execute(&self, identity: &SyntheticIdentity) -> BootstrapReport {
        let start = Instant::now();
        let mut state = BootstrapState::Created;

        loop {
            state = match state {
                BootstrapState::Created => {
                    debug!(email = %identity.email, "attempting signup");
                    let signup = self.api.sign_up(identity).await;
                    BootstrapState::after_signup(&signup)
                }
                BootstrapState::SignupFailed { reason } => {
                    debug!(%reason, "signup yielded no session, attempting password login");
                    let login = self.api.sign_in(identity).await;
                    BootstrapState::SignupFailed { reason }.after_login(&login)
                }
                BootstrapState::Finished { outcome, source } => {
                    match &outcome {
                        BootstrapOutcome::Authenticated(session) => info!(
                            user = %session.subject_id(),
                            token = %session.token_preview(),
                            ?source,
                            "session established"
                        ),
                        BootstrapOutcome::ConfirmationRequired { subject_id } => {
                            warn!(user = %subject_id, "signup requires email confirmation");
                        }
                        BootstrapOutcome::AuthFailed { reason } => {
                            warn!(%reason, "authentication failed");
                        }
                    }
                    return BootstrapReport {
                        outcome,
                        source,
                        email: identity.email.clone(),
                        duration_ms: elapsed_ms(start),
                    };
                }
            };
        }
    }
}
