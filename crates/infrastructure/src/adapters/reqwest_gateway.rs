//! Request gateway implementation using reqwest.
//!
//! This adapter implements the `Gateway` port using the reqwest library.
//! It attaches the backend headers, applies the per-request timeout and turns
//! every response, or the lack of one, into a classified `Outcome`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use pulse_application::ports::Gateway;
use pulse_domain::{
    DomainError, EndpointRef, GatewayConfig, HttpMethod, Outcome, auth::token_preview,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while building the gateway. Request failures are never
/// errors; they surface as [`Outcome::Failure`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway settings are invalid.
    #[error("invalid gateway settings: {0}")]
    Config(#[from] DomainError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// HTTP gateway to the backend, built on `reqwest::Client`.
///
/// Every request carries the anonymous key as `apikey`, a bearer token (the
/// session token when given, the anonymous key otherwise), a JSON content type
/// and `Prefer: return=representation` so mutations echo the affected rows.
pub struct ReqwestGateway {
    client: Client,
    config: GatewayConfig,
}

impl ReqwestGateway {
    /// Creates a gateway for `config`.
    ///
    /// Certificate validation follows `config.tls`; when it is disabled a
    /// warning is logged for each relaxed check.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the client cannot be
    /// created.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        for warning in config.tls.security_warnings() {
            warn!(target_url = %config.base_url, "{}", warning.message());
        }

        let client = Client::builder()
            .user_agent(concat!("pulse/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(config.tls.accept_invalid_certs)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// The settings this gateway was built with.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Describes a reqwest error that produced no response.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> String {
        let host = error
            .url()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_else(|| "unknown".to_string());

        if error.is_timeout() {
            return format!("timed out after {timeout_ms}ms waiting for {host}");
        }

        if error.is_connect() {
            let message = error.to_string();
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return format!("DNS lookup failed for {host}: {message}");
            }
            if lower.contains("refused") {
                let port = error
                    .url()
                    .and_then(reqwest::Url::port_or_known_default)
                    .unwrap_or(443);
                return format!("connection refused by {host}:{port}");
            }
            if lower.contains("certificate") || lower.contains("tls") {
                return format!("TLS handshake with {host} failed: {message}");
            }
            return format!("connection to {host} failed: {message}");
        }

        if error.is_redirect() {
            return format!("too many redirects from {host}");
        }

        error.to_string()
    }
}

#[async_trait]
impl Gateway for ReqwestGateway {
    async fn dispatch(&self, endpoint: EndpointRef, bearer: Option<&str>) -> Outcome {
        let family = endpoint.family();
        let method = endpoint.method();
        let timeout_ms = self.config.timeout_ms;

        let url = match endpoint.resolve(&self.config.base_url) {
            Ok(url) => url,
            Err(e) => return Outcome::transport_failure(e.to_string()),
        };

        let token = bearer.unwrap_or(&self.config.anon_key);
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(method), url.clone())
            .timeout(Duration::from_millis(timeout_ms))
            .header("apikey", &self.config.anon_key)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation");

        if let Some(body) = endpoint.body() {
            match serde_json::to_vec(body) {
                Ok(bytes) => builder = builder.body(bytes),
                Err(e) => return Outcome::transport_failure(format!("cannot encode body: {e}")),
            }
        }

        debug!(
            %method,
            %url,
            ?family,
            bearer = %token_preview(token),
            "dispatching request"
        );
        let start = Instant::now();

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let message = Self::map_error(&e, timeout_ms);
                debug!(%method, %url, error = %message, "request failed");
                return Outcome::transport_failure(message);
            }
        };

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return Outcome::transport_failure(format!(
                    "failed to read body: {}",
                    Self::map_error(&e, timeout_ms)
                ));
            }
        };

        let outcome = Outcome::classify(family, status, &body);
        debug!(
            %method,
            %url,
            status,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            %outcome,
            "response received"
        );
        outcome
    }

    fn target(&self) -> String {
        self.config.base_url.to_string()
    }
}
