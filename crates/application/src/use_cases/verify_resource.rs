//! Resource CRUD verification use case

use std::time::Instant;

use pulse_domain::{
    ClientRecord, EndpointRef, Outcome, Session, Step, StepReport, UPDATED_NAME, VerifyFailure,
};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::elapsed_ms;
use crate::ports::Gateway;

/// Result of one create, read, update, delete sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceVerification {
    /// Reports of the steps that ran, in order.
    pub reports: Vec<StepReport>,
    /// The step that halted the sequence, if any.
    pub failure: Option<VerifyFailure>,
    /// Id of the test record.
    pub record_id: String,
}

impl ResourceVerification {
    /// True if all four steps passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs create, read, update and delete against one collection, asserting the
/// observable state after each step. Halts at the first failed step.
pub struct VerifyResource<'a, G> {
    gateway: &'a G,
    collection: &'a str,
}

impl<'a, G: Gateway> VerifyResource<'a, G> {
    /// Creates a new `VerifyResource` use case.
    pub const fn new(gateway: &'a G, collection: &'a str) -> Self {
        Self {
            gateway,
            collection,
        }
    }

    /// Executes the sequence with a freshly generated record owned by `session`.
    pub async fn execute(&self, session: &Session) -> ResourceVerification {
        self.execute_with(session, ClientRecord::smoke(session.subject_id()))
            .await
    }

    /// Executes the sequence with a caller-supplied record.
    ///
    /// Read expects the record's own name back; update writes a name that
    /// always differs from it.
    pub async fn execute_with(
        &self,
        session: &Session,
        record: ClientRecord,
    ) -> ResourceVerification {
        let token = Some(session.access_token());
        let id = record.id.clone();
        let renamed = updated_name(&record.name);
        let mut reports = Vec::with_capacity(Phase::ALL.len());

        for phase in Phase::ALL {
            let step = phase.step();
            let start = Instant::now();
            let result = match phase {
                Phase::Create => self.create(&record, token).await,
                Phase::Read => self.read(&id, &record.name, token).await,
                Phase::Update => self.update(&id, &renamed, token).await,
                Phase::Delete => self.delete(&id, token).await,
            };
            let duration_ms = elapsed_ms(start);

            match result {
                Ok(actual) => {
                    info!(%step, record = %id, "step passed");
                    reports.push(
                        StepReport::pass_with_value(step, actual).with_duration_ms(duration_ms),
                    );
                }
                Err((failure, detail)) => {
                    warn!(%step, record = %id, %detail, "{failure}");
                    reports.push(
                        StepReport::fail(step, format!("{failure}: {detail}"))
                            .with_duration_ms(duration_ms),
                    );
                    return ResourceVerification {
                        reports,
                        failure: Some(failure),
                        record_id: id,
                    };
                }
            }
        }

        ResourceVerification {
            reports,
            failure: None,
            record_id: id,
        }
    }

    async fn create(&self, record: &ClientRecord, token: Option<&str>) -> StepResult {
        let body = serde_json::to_value(record)
            .map_err(|e| (VerifyFailure::CreateFailed, format!("cannot encode record: {e}")))?;
        let outcome = self
            .gateway
            .dispatch(EndpointRef::post(self.collection).json(body), token)
            .await;
        let row = first_row(&outcome)
            .ok_or_else(|| (VerifyFailure::CreateFailed, outcome.to_string()))?;

        match field(row, "id") {
            Some(id) if id == record.id => Ok(format!("id {id}")),
            other => Err((
                VerifyFailure::CreateFailed,
                format!("expected id {}, got {}", record.id, other.unwrap_or("none")),
            )),
        }
    }

    async fn fetch(&self, id: &str, token: Option<&str>) -> Outcome {
        let endpoint = EndpointRef::get(self.collection)
            .eq("id", id)
            .query("select", "*");
        self.gateway.dispatch(endpoint, token).await
    }

    async fn read(&self, id: &str, name: &str, token: Option<&str>) -> StepResult {
        let outcome = self.fetch(id, token).await;
        expect_name(&outcome, name).map_err(|detail| (VerifyFailure::ReadFailed, detail))
    }

    async fn update(&self, id: &str, name: &str, token: Option<&str>) -> StepResult {
        let endpoint = EndpointRef::patch(self.collection)
            .eq("id", id)
            .json(json!({ "name": name }));
        let outcome = self.gateway.dispatch(endpoint, token).await;
        expect_name(&outcome, name).map_err(|detail| (VerifyFailure::UpdateFailed, detail))?;
        debug!(record = %id, %outcome, "update acknowledged, re-reading");

        let reread = self.fetch(id, token).await;
        expect_name(&reread, name)
            .map_err(|detail| (VerifyFailure::UpdateFailed, format!("not persisted: {detail}")))
    }

    async fn delete(&self, id: &str, token: Option<&str>) -> StepResult {
        let outcome = self
            .gateway
            .dispatch(EndpointRef::delete(self.collection).eq("id", id), token)
            .await;
        if outcome.is_failure() {
            return Err((VerifyFailure::DeleteFailed, outcome.to_string()));
        }
        debug!(record = %id, %outcome, "delete acknowledged, re-reading");

        let reread = self.fetch(id, token).await;
        match reread.rows() {
            Some([]) => Ok("gone".to_string()),
            Some(rows) => Err((
                VerifyFailure::DeleteFailed,
                format!("{} row(s) still readable", rows.len()),
            )),
            None => Err((VerifyFailure::DeleteFailed, reread.to_string())),
        }
    }
}

type StepResult = Result<String, (VerifyFailure, String)>;

/// The four CRUD steps, in execution order.
#[derive(Debug, Clone, Copy)]
enum Phase {
    Create,
    Read,
    Update,
    Delete,
}

impl Phase {
    const ALL: [Self; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    const fn step(self) -> Step {
        match self {
            Self::Create => Step::Create,
            Self::Read => Step::Read,
            Self::Update => Step::Update,
            Self::Delete => Step::Delete,
        }
    }
}

fn updated_name(created: &str) -> String {
    if created == UPDATED_NAME {
        format!("{UPDATED_NAME} (renamed)")
    } else {
        UPDATED_NAME.to_string()
    }
}

fn first_row(outcome: &Outcome) -> Option<&Value> {
    outcome.first_row().or_else(|| {
        // a single-object representation is also accepted
        outcome.body().filter(|body| body.is_object())
    })
}

fn field<'v>(row: &'v Value, name: &str) -> Option<&'v str> {
    row.get(name).and_then(Value::as_str)
}

fn expect_name(outcome: &Outcome, expected: &str) -> Result<String, String> {
    let row = first_row(outcome).ok_or_else(|| outcome.to_string())?;
    match field(row, "name") {
        Some(name) if name == expected => Ok(format!("name {name:?}")),
        other => Err(format!("expected name {expected:?}, got {other:?}")),
    }
}
