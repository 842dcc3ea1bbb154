use std::time::Instant;

use anyhow::Result;
use pulse_application::{Gateway, ProbeConnectivity};
use pulse_domain::{AbortReason, RunReport};

use crate::GlobalArgs;

/// Execute the `probe` command: connectivity only, nothing stateful.
pub async fn execute(global: &GlobalArgs) -> Result<bool> {
    let settings = super::load_settings(global)?;
    let gateway = super::build_gateway(&settings)?;

    let start = Instant::now();
    let mut report = RunReport::new(gateway.target());
    let step = ProbeConnectivity::new(&gateway, &settings.suite.resource_collection)
        .execute()
        .await;
    let reachable = step.passed;
    report.record(step);

    let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let report = if reachable {
        report.conclude(elapsed)
    } else {
        report.abort(AbortReason::NoConnection, elapsed)
    };
    super::emit(&report, global.json)
}
