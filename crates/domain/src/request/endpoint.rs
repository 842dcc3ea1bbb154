//! Endpoint references and API family routing.
//!
//! The backend exposes two independent APIs behind one base URL: the
//! authentication API (`{base}/auth/v1/...`) and the generic resource API
//! (`{base}/rest/v1/{collection}`). They give different meanings to the same
//! status codes, so every request is tagged with its family before dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// Endpoint names starting with this prefix belong to the authentication API.
pub const AUTH_PREFIX: &str = "auth";

/// Base path of the generic resource API, relative to the backend URL.
pub const REST_BASE_PATH: &str = "rest/v1";

/// The API an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiFamily {
    /// Account creation, token exchange and logout.
    Auth,
    /// Row-level REST access to named collections.
    Rest,
}

impl ApiFamily {
    /// Classifies an endpoint name by prefix. Leading slashes are ignored.
    #[must_use]
    pub fn of(path: &str) -> Self {
        if path.trim_start_matches('/').starts_with(AUTH_PREFIX) {
            Self::Auth
        } else {
            Self::Rest
        }
    }

    /// Returns true if `status` is an anticipated, non-fatal rejection for this family.
    ///
    /// Only the authentication API signals idempotent-retry conditions such as
    /// "already registered" through 400/422.
    #[must_use]
    pub const fn is_expected_error(self, status: u16) -> bool {
        matches!(self, Self::Auth) && matches!(status, 400 | 422)
    }
}

/// A single request against one of the two APIs.
///
/// Built fresh for every call and never mutated after dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRef {
    path: String,
    method: HttpMethod,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl EndpointRef {
    /// Creates an endpoint reference with the given method.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            query: Vec::new(),
            body: None,
        }
    }

    /// Shorthand for a GET endpoint.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Shorthand for a POST endpoint.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Shorthand for a PATCH endpoint.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Shorthand for a DELETE endpoint.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Appends an equality filter (`column=eq.value`).
    #[must_use]
    pub fn eq(self, column: impl Into<String>, value: impl AsRef<str>) -> Self {
        let value = format!("eq.{}", value.as_ref());
        self.query(column, value)
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Endpoint name as given at construction.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Query parameters in insertion order.
    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The API this endpoint is routed to.
    #[must_use]
    pub fn family(&self) -> ApiFamily {
        ApiFamily::of(&self.path)
    }

    /// Resolves this endpoint against the backend base URL.
    ///
    /// Authentication endpoints resolve to `{base}/{path}`; everything else to
    /// `{base}/rest/v1/{path}`. Any path prefix on `base` is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidEndpoint`] for an empty path or one that
    /// embeds its own query string, and [`DomainError::InvalidUrl`] if the
    /// joined URL does not parse.
    pub fn resolve(&self, base: &Url) -> DomainResult<Url> {
        let path = self.path.trim_start_matches('/');
        if path.is_empty() || path.contains('?') {
            return Err(DomainError::InvalidEndpoint(self.path.clone()));
        }

        let root = base.as_str().trim_end_matches('/');
        let joined = match self.family() {
            ApiFamily::Auth => format!("{root}/{path}"),
            ApiFamily::Rest => format!("{root}/{REST_BASE_PATH}/{path}"),
        };

        let mut url =
            Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}
