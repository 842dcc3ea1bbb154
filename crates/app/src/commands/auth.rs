use std::time::Instant;

use anyhow::Result;
use pulse_application::{BootstrapSession, EndSession, Gateway, GatewayAuthApi};
use pulse_domain::RunReport;
use tracing::info;

use crate::GlobalArgs;

/// Execute the `auth` command: bootstrap a session, then sign it out unless
/// teardown is disabled.
pub async fn execute(global: &GlobalArgs) -> Result<bool> {
    let settings = super::load_settings(global)?;
    let gateway = super::build_gateway(&settings)?;
    let auth = GatewayAuthApi::new(&gateway);

    let start = Instant::now();
    let mut report = RunReport::new(gateway.target());
    let identity = settings.suite.identity.identity();
    let bootstrap = BootstrapSession::new(&auth).execute(&identity).await;
    report.record(bootstrap.step_report());

    let elapsed = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let report = match (bootstrap.outcome.session(), bootstrap.outcome.abort_reason()) {
        (Some(session), _) => {
            info!(token = %session.token_preview(), "session obtained");
            if settings.suite.teardown {
                report.record(EndSession::new(&auth).execute(session).await);
            }
            report.conclude(elapsed())
        }
        (None, Some(reason)) => report.abort(reason, elapsed()),
        (None, None) => report.conclude(elapsed()),
    };
    super::emit(&report, global.json)
}
