//! Settings loader built on the `config` crate.

use std::collections::HashMap;
use std::path::Path;

use config::{Config, Environment, File};
use pulse_domain::auth::DEFAULT_PASSWORD;
use pulse_domain::settings::{
    DEFAULT_PROTECTED_COLLECTION, DEFAULT_RESOURCE_COLLECTION, DEFAULT_TIMEOUT_MS,
};
use pulse_domain::{DomainError, GatewayConfig, IdentityMode, SuiteConfig, TlsPolicy};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Prefix of the environment variables read by the loader (`PULSE_BASE_URL`).
pub const ENV_PREFIX: &str = "PULSE";

const LEGACY_URL_VAR: &str = "SUPABASE_URL";
const LEGACY_KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),

    /// A required setting is absent from every source.
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    /// A setting is present but invalid.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Values given on the command line; each one wins over every other source.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Backend root URL.
    pub base_url: Option<String>,
    /// Anonymous API key.
    pub anon_key: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Disable certificate validation.
    pub accept_invalid_certs: Option<bool>,
    /// Fixed identity email.
    pub identity_email: Option<String>,
    /// Skip the sign-out step.
    pub skip_teardown: bool,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    base_url: Option<String>,
    anon_key: Option<String>,
    request_timeout_ms: u64,
    accept_invalid_certs: bool,
    resource_collection: String,
    protected_collection: String,
    identity_email: Option<String>,
    identity_password: String,
    teardown: bool,
}

/// Fully validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Gateway connection settings.
    pub gateway: GatewayConfig,
    /// What the suite verifies.
    pub suite: SuiteConfig,
}

impl Settings {
    /// Loads settings from the process environment, an optional file and the
    /// given overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a required value is
    /// missing, or a value fails validation.
    pub fn load(path: Option<&Path>, overrides: SettingsOverrides) -> Result<Self, ConfigError> {
        Self::load_from(path, overrides, None)
    }

    /// Like [`Settings::load`], reading variables from `env` instead of the
    /// process environment.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn load_from(
        path: Option<&Path>,
        overrides: SettingsOverrides,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let legacy = |name: &str| match &env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        };

        let mut builder = Config::builder()
            .set_default("request_timeout_ms", DEFAULT_TIMEOUT_MS)?
            .set_default("accept_invalid_certs", false)?
            .set_default("resource_collection", DEFAULT_RESOURCE_COLLECTION)?
            .set_default("protected_collection", DEFAULT_PROTECTED_COLLECTION)?
            .set_default("identity_password", DEFAULT_PASSWORD)?
            .set_default("teardown", true)?;
        if let Some(url) = legacy(LEGACY_URL_VAR) {
            builder = builder.set_default("base_url", url)?;
        }
        if let Some(key) = legacy(LEGACY_KEY_VAR) {
            builder = builder.set_default("anon_key", key)?;
        }

        if let Some(path) = path {
            debug!(path = %path.display(), "reading config file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("base_url", overrides.base_url)?
            .set_override_option("anon_key", overrides.anon_key)?
            .set_override_option("request_timeout_ms", overrides.timeout_ms)?
            .set_override_option("accept_invalid_certs", overrides.accept_invalid_certs)?
            .set_override_option("identity_email", overrides.identity_email)?;
        if overrides.skip_teardown {
            builder = builder.set_override("teardown", false)?;
        }

        let raw: RawSettings = builder.build()?.try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let base_url = non_blank(raw.base_url).ok_or(ConfigError::Missing("base_url"))?;
        let anon_key = non_blank(raw.anon_key).ok_or(ConfigError::Missing("anon_key"))?;

        let tls = if raw.accept_invalid_certs {
            TlsPolicy::insecure()
        } else {
            TlsPolicy::verify()
        };
        let gateway = GatewayConfig::new(&base_url, anon_key)?
            .with_timeout_ms(raw.request_timeout_ms)
            .with_tls(tls);
        gateway.validate()?;

        let identity = match non_blank(raw.identity_email) {
            Some(email) => IdentityMode::Fixed {
                email,
                password: raw.identity_password,
            },
            None => IdentityMode::Random,
        };
        let suite = SuiteConfig {
            resource_collection: raw.resource_collection,
            protected_collection: raw.protected_collection,
            identity,
            teardown: raw.teardown,
        };
        suite.validate()?;

        Ok(Self { gateway, suite })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
