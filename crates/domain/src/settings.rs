//! Run settings.
//!
//! Validated values the gateway and the suite are built from. Loading them
//! from files and the environment is the infrastructure layer's job.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::{DEFAULT_PASSWORD, SyntheticIdentity};
use crate::error::{DomainError, DomainResult};
use crate::tls::TlsPolicy;

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Collection written by the resource verifier.
pub const DEFAULT_RESOURCE_COLLECTION: &str = "clients";

/// Collection read by the access probe.
pub const DEFAULT_PROTECTED_COLLECTION: &str = "chemical_inventory";

/// Connection settings for the request gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Backend root URL; both API families hang off it.
    pub base_url: Url,
    /// Anonymous/public API key, sent as `apikey` and as the default bearer.
    pub anon_key: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Transport trust decision.
    pub tls: TlsPolicy,
}

impl GatewayConfig {
    /// Parses and validates a base URL and key with default timeout and TLS.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not absolute http(s) or the key is blank.
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> DomainResult<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_url}")))?;
        let config = Self {
            base_url,
            anon_key: anon_key.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            tls: TlsPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the TLS policy.
    #[must_use]
    pub const fn with_tls(mut self, tls: TlsPolicy) -> Self {
        self.tls = tls;
        self
    }

    /// Checks scheme, key and timeout.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> DomainResult<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                self.base_url.scheme()
            )));
        }
        if self.base_url.cannot_be_a_base() || self.base_url.host_str().is_none() {
            return Err(DomainError::InvalidUrl(self.base_url.to_string()));
        }
        if self.anon_key.trim().is_empty() {
            return Err(DomainError::MissingSetting("anon_key"));
        }
        if self.timeout_ms == 0 {
            return Err(DomainError::InvalidSetting {
                name: "request_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// How the bootstrapper picks its credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IdentityMode {
    /// Fresh random account per run; signup never conflicts.
    #[default]
    Random,
    /// Same account every run; the second run exercises the login fallback.
    Fixed {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
}

impl IdentityMode {
    /// A fixed identity with the default password.
    pub fn fixed(email: impl Into<String>) -> Self {
        Self::Fixed {
            email: email.into(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }

    /// Produces the identity for one run.
    #[must_use]
    pub fn identity(&self) -> SyntheticIdentity {
        match self {
            Self::Random => SyntheticIdentity::random(),
            Self::Fixed { email, password } => SyntheticIdentity::fixed(email, password),
        }
    }
}

/// What the suite verifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Collection written by the CRUD sequence.
    pub resource_collection: String,
    /// Collection read by the access probe.
    pub protected_collection: String,
    /// Credential strategy.
    pub identity: IdentityMode,
    /// Sign the session out after the access probe.
    pub teardown: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            resource_collection: DEFAULT_RESOURCE_COLLECTION.to_string(),
            protected_collection: DEFAULT_PROTECTED_COLLECTION.to_string(),
            identity: IdentityMode::Random,
            teardown: true,
        }
    }
}

impl SuiteConfig {
    /// Checks collection names and the fixed identity.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> DomainResult<()> {
        validate_collection("resource_collection", &self.resource_collection)?;
        validate_collection("protected_collection", &self.protected_collection)?;
        if let IdentityMode::Fixed { email, password } = &self.identity {
            if !email.contains('@') {
                return Err(DomainError::InvalidSetting {
                    name: "identity_email",
                    reason: format!("`{email}` is not an email address"),
                });
            }
            if password.is_empty() {
                return Err(DomainError::MissingSetting("identity_password"));
            }
        }
        Ok(())
    }
}

fn validate_collection(name: &'static str, value: &str) -> DomainResult<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidSetting {
            name,
            reason: format!("`{value}` is not a collection name"),
        })
    }
}
