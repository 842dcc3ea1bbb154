use anyhow::Result;
use pulse_application::{GatewayAuthApi, RunSuite};

use crate::GlobalArgs;

/// Execute the `run` command: the full verification sequence.
pub async fn execute(global: &GlobalArgs) -> Result<bool> {
    let settings = super::load_settings(global)?;
    let gateway = super::build_gateway(&settings)?;
    let auth = GatewayAuthApi::new(&gateway);

    let report = RunSuite::new(&gateway, &auth, settings.suite)?.execute().await;
    super::emit(&report, global.json)
}
