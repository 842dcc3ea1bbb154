//! Access probe use case

use std::time::Instant;

use pulse_domain::{EndpointRef, Outcome, Session, Step, StepReport};
use tracing::{info, warn};

use super::elapsed_ms;
use crate::ports::Gateway;

/// Read-only check that a protected collection is reachable under a session.
///
/// Any row count passes, zero included; only a `Failure` outcome fails.
pub struct ProbeAccess<'a, G> {
    gateway: &'a G,
    collection: &'a str,
}

impl<'a, G: Gateway> ProbeAccess<'a, G> {
    /// Creates a new `ProbeAccess` use case.
    pub const fn new(gateway: &'a G, collection: &'a str) -> Self {
        Self {
            gateway,
            collection,
        }
    }

    /// Executes the probe with the session's bearer token.
    pub async fn execute(&self, session: &Session) -> StepReport {
        let start = Instant::now();
        let endpoint = EndpointRef::get(self.collection).query("limit", "1");
        let outcome = self
            .gateway
            .dispatch(endpoint, Some(session.access_token()))
            .await;

        let report = match &outcome {
            Outcome::Failure { .. } => {
                warn!(collection = %self.collection, %outcome, "protected collection not accessible");
                StepReport::fail(Step::Access, outcome.to_string())
            }
            Outcome::Success { .. } | Outcome::EmptySuccess | Outcome::ExpectedError { .. } => {
                let rows = outcome.rows().map_or(0, <[_]>::len);
                info!(collection = %self.collection, rows, "protected collection accessible");
                StepReport::pass_with_value(
                    Step::Access,
                    format!("{} returned {rows} row(s)", self.collection),
                )
            }
        };
        report.with_duration_ms(elapsed_ms(start))
    }
}
