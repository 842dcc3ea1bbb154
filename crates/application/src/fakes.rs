//! In-memory ports for use case tests.

#![allow(clippy::expect_used, clippy::significant_drop_tightening)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use pulse_domain::{ApiFamily, EndpointRef, HttpMethod, Outcome, Session, SyntheticIdentity};
use serde_json::{Value, json};

use crate::ports::{AuthApi, Gateway};

/// A dispatched request as seen by a fake.
#[derive(Debug, Clone)]
pub struct Call {
    pub endpoint: EndpointRef,
    pub bearer: Option<String>,
}

/// Replays canned outcomes in order; `Failure` once the script runs dry.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Outcome>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGateway {
    pub fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("Lock poisoned").clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn dispatch(&self, endpoint: EndpointRef, bearer: Option<&str>) -> Outcome {
        self.calls.lock().expect("Lock poisoned").push(Call {
            endpoint,
            bearer: bearer.map(String::from),
        });
        self.script
            .lock()
            .expect("Lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Outcome::transport_failure("script exhausted"))
    }

    fn target(&self) -> String {
        "scripted://backend".to_string()
    }
}

/// Ways the in-memory backend can misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    /// Inserts succeed but echo a different id.
    WrongIdOnInsert,
    /// Updates are acknowledged but not applied; the old row is echoed.
    IgnoreUpdates,
    /// Updates echo the patched row but are never stored.
    EchoUnsavedUpdates,
    /// Deletes are acknowledged but not applied.
    IgnoreDeletes,
    /// Every REST call is rejected with 401.
    DenyAll,
}

/// A tiny REST backend: one table per collection, `id=eq.` filters only.
pub struct MemoryGateway {
    rows: Mutex<Vec<(String, Value)>>,
    fault: Fault,
    calls: Mutex<Vec<Call>>,
}

impl MemoryGateway {
    pub fn new(fault: Fault) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fault,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn seed(self, collection: &str, rows: impl IntoIterator<Item = Value>) -> Self {
        self.rows
            .lock()
            .expect("Lock poisoned")
            .extend(rows.into_iter().map(|row| (collection.to_string(), row)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("Lock poisoned").clone()
    }

    pub fn row_count(&self, collection: &str) -> usize {
        self.rows
            .lock()
            .expect("Lock poisoned")
            .iter()
            .filter(|(c, _)| c == collection)
            .count()
    }

    fn matches(endpoint: &EndpointRef, collection: &str, row: &(String, Value)) -> bool {
        row.0 == collection
            && endpoint.query_params().iter().all(|(name, value)| {
                value.strip_prefix("eq.").is_none_or(|expected| {
                    row.1.get(name).and_then(Value::as_str) == Some(expected)
                })
            })
    }

    fn handle_rest(&self, endpoint: &EndpointRef) -> Outcome {
        if self.fault == Fault::DenyAll {
            return Outcome::Failure {
                status: Some(401),
                message: "permission denied".to_string(),
            };
        }
        let collection = endpoint.path();
        let mut rows = self.rows.lock().expect("Lock poisoned");
        let selected: Vec<Value> = rows
            .iter()
            .filter(|row| Self::matches(endpoint, collection, row))
            .map(|(_, row)| row.clone())
            .collect();

        let limit = endpoint
            .query_params()
            .iter()
            .find(|(name, _)| name == "limit")
            .and_then(|(_, value)| value.parse::<usize>().ok());

        let body = match endpoint.method() {
            HttpMethod::Get => {
                let mut selected = selected;
                if let Some(limit) = limit {
                    selected.truncate(limit);
                }
                Value::Array(selected)
            }
            HttpMethod::Post => {
                let Some(mut row) = endpoint.body().cloned() else {
                    return Outcome::Failure {
                        status: Some(400),
                        message: "missing body".to_string(),
                    };
                };
                rows.push((collection.to_string(), row.clone()));
                if self.fault == Fault::WrongIdOnInsert {
                    row["id"] = json!("someone-else");
                }
                Value::Array(vec![row])
            }
            HttpMethod::Patch => {
                let patch = endpoint.body().cloned().unwrap_or_else(|| json!({}));
                let mut updated = Vec::new();
                for row in rows
                    .iter_mut()
                    .filter(|row| Self::matches(endpoint, collection, row))
                {
                    let mut next = row.1.clone();
                    if let (Some(target), Some(fields)) = (next.as_object_mut(), patch.as_object())
                    {
                        for (key, value) in fields {
                            target.insert(key.clone(), value.clone());
                        }
                    }
                    match self.fault {
                        Fault::IgnoreUpdates => updated.push(row.1.clone()),
                        Fault::EchoUnsavedUpdates => updated.push(next),
                        _ => {
                            row.1 = next.clone();
                            updated.push(next);
                        }
                    }
                }
                Value::Array(updated)
            }
            HttpMethod::Delete => {
                if self.fault != Fault::IgnoreDeletes {
                    rows.retain(|row| !Self::matches(endpoint, collection, row));
                }
                Value::Array(selected)
            }
        };
        Outcome::Success { body }
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn dispatch(&self, endpoint: EndpointRef, bearer: Option<&str>) -> Outcome {
        let outcome = match endpoint.family() {
            ApiFamily::Rest => self.handle_rest(&endpoint),
            ApiFamily::Auth => Outcome::EmptySuccess,
        };
        self.calls.lock().expect("Lock poisoned").push(Call {
            endpoint,
            bearer: bearer.map(String::from),
        });
        outcome
    }

    fn target(&self) -> String {
        "memory://backend".to_string()
    }
}

/// Which auth operation a scripted call hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCall {
    SignUp,
    SignIn,
    SignOut,
}

/// Auth API with one canned outcome per operation.
pub struct ScriptedAuth {
    sign_up: Outcome,
    sign_in: Outcome,
    sign_out: Outcome,
    calls: Mutex<Vec<AuthCall>>,
}

impl ScriptedAuth {
    pub fn new(sign_up: Outcome, sign_in: Outcome) -> Self {
        Self {
            sign_up,
            sign_in,
            sign_out: Outcome::EmptySuccess,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_sign_out(mut self, outcome: Outcome) -> Self {
        self.sign_out = outcome;
        self
    }

    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().expect("Lock poisoned").clone()
    }

    fn record(&self, call: AuthCall) {
        self.calls.lock().expect("Lock poisoned").push(call);
    }
}

#[async_trait]
impl AuthApi for ScriptedAuth {
    async fn sign_up(&self, _identity: &SyntheticIdentity) -> Outcome {
        self.record(AuthCall::SignUp);
        self.sign_up.clone()
    }

    async fn sign_in(&self, _identity: &SyntheticIdentity) -> Outcome {
        self.record(AuthCall::SignIn);
        self.sign_in.clone()
    }

    async fn sign_out(&self, _session: &Session) -> Outcome {
        self.record(AuthCall::SignOut);
        self.sign_out.clone()
    }
}

/// A signup/login body carrying a session.
pub fn session_body(user_id: &str, token: &str) -> Outcome {
    Outcome::Success {
        body: json!({
            "access_token": token,
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {"id": user_id}
        }),
    }
}

/// A signup body for an account awaiting confirmation.
pub fn unconfirmed_body(user_id: &str) -> Outcome {
    Outcome::Success {
        body: json!({"id": user_id, "email": "smoke@test.com", "confirmation_sent_at": "2024-01-01T00:00:00Z"}),
    }
}
