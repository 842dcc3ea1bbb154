//! Pulse - backend verification harness
//!
//! Exercises a backend's REST and authentication surface end to end:
//! connectivity, session bootstrap, CRUD round trip, access policy and
//! sign-out. Exits 0 when every step passes, 1 when a step fails or the run
//! aborts, and 2 when the settings are unusable.

mod commands;
mod logging;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pulse_infrastructure::SettingsOverrides;

#[derive(Parser)]
#[command(
    name = "pulse",
    version,
    about = "End-to-end verification of a REST and auth backend"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Backend root URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Anonymous API key
    #[arg(long, global = true)]
    anon_key: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Accept invalid TLS certificates (test backends only)
    #[arg(long, global = true)]
    insecure: bool,

    /// Use this account instead of a fresh random one
    #[arg(long, global = true)]
    email: Option<String>,

    /// Keep the session alive at the end of the run
    #[arg(long, global = true)]
    no_teardown: bool,

    /// Print the report as JSON instead of the step trace
    #[arg(long, global = true)]
    json: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            base_url: self.base_url.clone(),
            anon_key: self.anon_key.clone(),
            timeout_ms: self.timeout_ms,
            accept_invalid_certs: self.insecure.then_some(true),
            identity_email: self.email.clone(),
            skip_teardown: self.no_teardown,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full verification sequence (default)
    Run,
    /// Check only that the backend answers
    Probe,
    /// Bootstrap a session and report how it was obtained
    Auth,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(&cli.global.log_level);

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::execute(&cli.global).await,
        Commands::Probe => commands::probe::execute(&cli.global).await,
        Commands::Auth => commands::auth::execute(&cli.global).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
