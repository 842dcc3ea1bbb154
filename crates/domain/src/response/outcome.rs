//! Classified result of one dispatched request.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StatusCode;
use crate::request::ApiFamily;

/// The result of one request against the backend.
///
/// Exactly one variant applies; a body and a failure never coexist. Every
/// call site matches on this instead of re-deriving the status policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// 2xx with a decoded JSON body (mapping or sequence).
    Success {
        /// Decoded response body.
        body: Value,
    },
    /// 2xx with an empty body.
    EmptySuccess,
    /// 400/422 from the authentication API. Callers inspect it, never abort on it.
    ExpectedError {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },
    /// Anything else: non-2xx on the resource API, transport errors, undecodable bodies.
    Failure {
        /// HTTP status code, `None` when no response was received.
        status: Option<u16>,
        /// Raw response body or transport error description.
        message: String,
    },
}

impl Outcome {
    /// Classifies a received response.
    #[must_use]
    pub fn classify(family: ApiFamily, status: u16, body: &[u8]) -> Self {
        let code = StatusCode::new(status);
        if code.is_success() {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Self::EmptySuccess;
            }
            return match serde_json::from_slice::<Value>(body) {
                Ok(body) => Self::Success { body },
                Err(e) => Self::Failure {
                    status: Some(status),
                    message: format!("malformed JSON body: {e}"),
                },
            };
        }

        let message = String::from_utf8_lossy(body).into_owned();
        if family.is_expected_error(status) {
            Self::ExpectedError { status, message }
        } else {
            Self::Failure {
                status: Some(status),
                message,
            }
        }
    }

    /// Creates a failure for a request that never produced a response.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::Failure {
            status: None,
            message: message.into(),
        }
    }

    /// Returns true for the unexpected-error variant.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Returns true if the backend produced no HTTP response at all.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Failure { status: None, .. })
    }

    /// HTTP status, when one is carried.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ExpectedError { status, .. } => Some(*status),
            Self::Failure { status, .. } => *status,
            Self::Success { .. } | Self::EmptySuccess => None,
        }
    }

    /// Decoded body, for `Success` only.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Success { body } => Some(body),
            _ => None,
        }
    }

    /// Rows of a sequence body. `EmptySuccess` is not a sequence.
    #[must_use]
    pub fn rows(&self) -> Option<&[Value]> {
        self.body().and_then(Value::as_array).map(Vec::as_slice)
    }

    /// First row of a sequence body.
    #[must_use]
    pub fn first_row(&self) -> Option<&Value> {
        self.rows().and_then(<[Value]>::first)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { body } => match body.as_array() {
                Some(rows) => write!(f, "success ({} rows)", rows.len()),
                None => f.write_str("success"),
            },
            Self::EmptySuccess => f.write_str("success (empty body)"),
            Self::ExpectedError { status, message } => {
                write!(f, "expected error {}: {message}", StatusCode::new(*status))
            }
            Self::Failure {
                status: Some(status),
                message,
            } => write!(f, "failed with {}: {message}", StatusCode::new(*status)),
            Self::Failure {
                status: None,
                message,
            } => write!(f, "request failed: {message}"),
        }
    }
}
