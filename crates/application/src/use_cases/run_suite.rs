//! Full verification run

use std::time::Instant;

use pulse_domain::{AbortReason, RunReport, SuiteConfig};
use tracing::{Instrument, info, info_span, warn};

use super::{
    BootstrapSession, EndSession, ProbeAccess, ProbeConnectivity, VerifyResource, elapsed_ms,
};
use crate::error::ApplicationResult;
use crate::ports::{AuthApi, Gateway};

/// Runs connectivity, bootstrap, CRUD, access and teardown in order.
///
/// The first two steps are gates: if either fails the run is aborted and
/// nothing stateful is attempted. Every call is awaited before the next is
/// issued.
pub struct RunSuite<'a, G, A> {
    gateway: &'a G,
    auth: &'a A,
    config: SuiteConfig,
}

impl<'a, G: Gateway, A: AuthApi> RunSuite<'a, G, A> {
    /// Creates a new `RunSuite` use case.
    ///
    /// # Errors
    ///
    /// Returns an error if the suite configuration is invalid.
    pub fn new(gateway: &'a G, auth: &'a A, config: SuiteConfig) -> ApplicationResult<Self> {
        config.validate()?;
        Ok(Self {
            gateway,
            auth,
            config,
        })
    }

    /// Executes the run and returns its report.
    pub async fn execute(&self) -> RunReport {
        let span = info_span!("run", target_url = %self.gateway.target());
        self.run().instrument(span).await
    }

    async fn run(&self) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport::new(self.gateway.target());

        let connectivity = ProbeConnectivity::new(self.gateway, &self.config.resource_collection)
            .execute()
            .await;
        let reachable = connectivity.passed;
        report.record(connectivity);
        if !reachable {
            warn!("aborting run: backend unreachable");
            return report.abort(AbortReason::NoConnection, elapsed_ms(start));
        }

        let identity = self.config.identity.identity();
        let bootstrap = BootstrapSession::new(self.auth).execute(&identity).await;
        report.record(bootstrap.step_report());
        let Some(session) = bootstrap.outcome.session().cloned() else {
            let reason = bootstrap
                .outcome
                .abort_reason()
                .unwrap_or(AbortReason::AuthFailed);
            warn!(%reason, "aborting run");
            return report.abort(reason, elapsed_ms(start));
        };

        let crud = VerifyResource::new(self.gateway, &self.config.resource_collection)
            .execute(&session)
            .await;
        report.extend(crud.reports);

        let access = ProbeAccess::new(self.gateway, &self.config.protected_collection)
            .execute(&session)
            .await;
        report.record(access);

        if self.config.teardown {
            report.record(EndSession::new(self.auth).execute(&session).await);
        }

        let report = report.conclude(elapsed_ms(start));
        info!(
            passed = report.passed(),
            failed = report.failed(),
            duration_ms = report.duration_ms,
            "run finished"
        );
        report
    }
}
