//! Connectivity probe use case

use std::time::Instant;

use pulse_domain::{EndpointRef, Outcome, Step, StepReport};
use tracing::{info, warn};

use super::elapsed_ms;
use crate::ports::Gateway;

/// Checks that the backend answers before anything stateful runs.
///
/// Issues a cheap count query with the anonymous key only. The probe is about
/// liveness, not authorization: a policy denial still proves the backend is
/// up. It fails when no HTTP response arrives or the backend answers 5xx.
pub struct ProbeConnectivity<'a, G> {
    gateway: &'a G,
    collection: &'a str,
}

impl<'a, G: Gateway> ProbeConnectivity<'a, G> {
    /// Creates a new `ProbeConnectivity` use case.
    pub const fn new(gateway: &'a G, collection: &'a str) -> Self {
        Self {
            gateway,
            collection,
        }
    }

    /// Executes the probe.
    pub async fn execute(&self) -> StepReport {
        let start = Instant::now();
        let endpoint = EndpointRef::get(self.collection).query("select", "count");
        let outcome = self.gateway.dispatch(endpoint, None).await;

        let report = match &outcome {
            Outcome::Failure { status: None, .. } => {
                StepReport::fail(Step::Connectivity, outcome.to_string())
            }
            Outcome::Failure {
                status: Some(status),
                ..
            } if *status >= 500 => StepReport::fail(Step::Connectivity, outcome.to_string()),
            Outcome::Failure { .. }
            | Outcome::Success { .. }
            | Outcome::EmptySuccess
            | Outcome::ExpectedError { .. } => {
                StepReport::pass_with_value(Step::Connectivity, outcome.to_string())
            }
        };

        if report.passed {
            info!(target_url = %self.gateway.target(), %outcome, "backend reachable");
        } else {
            warn!(target_url = %self.gateway.target(), %outcome, "backend unreachable");
        }
        report.with_duration_ms(elapsed_ms(start))
    }
}
