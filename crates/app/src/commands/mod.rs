//! Subcommand implementations.

pub mod auth;
pub mod probe;
pub mod run;

use anyhow::{Context, Result};
use pulse_domain::RunReport;
use pulse_infrastructure::{ReqwestGateway, Settings};

use crate::GlobalArgs;
use crate::render;

/// Loads settings from every source, command-line flags last.
fn load_settings(global: &GlobalArgs) -> Result<Settings> {
    let settings = Settings::load(global.config.as_deref(), global.overrides())
        .context("failed to load settings")?;
    tracing::debug!(
        base_url = %settings.gateway.base_url,
        timeout_ms = settings.gateway.timeout_ms,
        "settings loaded"
    );
    Ok(settings)
}

/// Builds the HTTP gateway for the configured backend.
fn build_gateway(settings: &Settings) -> Result<ReqwestGateway> {
    ReqwestGateway::new(settings.gateway.clone()).context("failed to create gateway")
}

/// Prints the report and returns whether the run passed.
fn emit(report: &RunReport, json: bool) -> Result<bool> {
    if json {
        let output = serde_json::to_string_pretty(report).context("failed to encode report")?;
        println!("{output}");
    } else {
        print!("{}", render::trace(report));
    }
    Ok(report.verdict.is_success())
}
