//! Transport trust policy.

use serde::{Deserialize, Serialize};

/// TLS trust decision for the gateway transport.
///
/// Verification is on unless the operator explicitly opts out for a known
/// test target (self-signed or locally proxied backend).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TlsPolicy {
    /// Accept invalid/self-signed certificates and mismatched hostnames (dangerous!).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl TlsPolicy {
    /// Full certificate and hostname verification.
    #[must_use]
    pub const fn verify() -> Self {
        Self {
            accept_invalid_certs: false,
        }
    }

    /// Accepts any certificate.
    /// WARNING: only for a controlled test backend.
    #[must_use]
    pub const fn insecure() -> Self {
        Self {
            accept_invalid_certs: true,
        }
    }

    /// Lists the dangerous options this policy enables.
    #[must_use]
    pub fn security_warnings(&self) -> Vec<TlsSecurityWarning> {
        if self.accept_invalid_certs {
            vec![
                TlsSecurityWarning::AcceptingInvalidCertificates,
                TlsSecurityWarning::AcceptingInvalidHostnames,
            ]
        } else {
            Vec::new()
        }
    }

    /// Check if this is a secure configuration.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.security_warnings().is_empty()
    }
}

/// Security warnings for relaxed TLS policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsSecurityWarning {
    /// Accepting invalid certificates.
    AcceptingInvalidCertificates,
    /// Accepting invalid hostnames.
    AcceptingInvalidHostnames,
}

impl TlsSecurityWarning {
    /// Get a user-friendly message for this warning.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::AcceptingInvalidCertificates => {
                "Accepting invalid certificates. Connections may be intercepted by attackers."
            }
            Self::AcceptingInvalidHostnames => {
                "Accepting invalid hostnames. The server identity is not being verified."
            }
        }
    }
}
