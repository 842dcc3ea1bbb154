//! Ephemeral test records written by the resource verifier.

use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// Name written at creation time.
pub const CREATED_NAME: &str = "Smoke Test Client";

/// Name written by the update step.
pub const UPDATED_NAME: &str = "Smoke Test Updated";

/// A client row owned by the bootstrapped user.
///
/// Its `id` correlates the create, read, update and delete steps of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Primary key, generated client-side.
    pub id: String,
    /// Owning user; row-level policies key on this column.
    pub user_id: String,
    /// Display name, the field asserted on read and update.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Star rating, 1 to 5.
    pub rating: u8,
    /// Lifetime revenue.
    pub total_spent: f64,
    /// Number of completed jobs.
    pub lifetime_jobs: u32,
}

impl ClientRecord {
    /// A fully populated record with a fresh id, owned by `owner_id`.
    pub fn smoke(owner_id: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            user_id: owner_id.into(),
            name: CREATED_NAME.to_string(),
            email: "smoke@test.com".to_string(),
            rating: 5,
            total_spent: 0.0,
            lifetime_jobs: 0,
        }
    }
}
