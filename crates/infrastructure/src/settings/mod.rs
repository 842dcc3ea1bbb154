//! Layered settings loading.
//!
//! Settings come from, in increasing precedence: built-in defaults, the
//! `SUPABASE_URL` / `SUPABASE_ANON_KEY` variables, an optional config file,
//! `PULSE_*` environment variables and command-line overrides.

mod loader;

pub use loader::{ConfigError, ENV_PREFIX, Settings, SettingsOverrides};
