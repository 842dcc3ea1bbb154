//! Session teardown use case

use std::time::Instant;

use pulse_domain::{Outcome, Session, Step, StepReport};
use tracing::{info, warn};

use super::elapsed_ms;
use crate::ports::AuthApi;

/// Revokes a session at the end of a run.
///
/// The report is advisory: a rejected sign-out never fails the run.
pub struct EndSession<'a, A> {
    api: &'a A,
}

impl<'a, A: AuthApi> EndSession<'a, A> {
    /// Creates a new `EndSession` use case.
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Signs `session` out.
    pub async fn execute(&self, session: &Session) -> StepReport {
        let start = Instant::now();
        let outcome = self.api.sign_out(session).await;

        let report = match &outcome {
            Outcome::Success { .. } | Outcome::EmptySuccess => {
                info!(token = %session.token_preview(), "session revoked");
                StepReport::pass_with_value(Step::Teardown, outcome.to_string())
            }
            Outcome::ExpectedError { .. } | Outcome::Failure { .. } => {
                warn!(%outcome, "sign-out rejected");
                StepReport::fail(Step::Teardown, outcome.to_string())
            }
        };
        report.advisory().with_duration_ms(elapsed_ms(start))
    }
}
