//! ID generation utilities.

use uuid::Uuid;

/// Generates a new random UUID v4 as a string.
///
/// Used as the primary key of ephemeral test records, so collisions between
/// concurrent runs against the same backend are negligible.
#[must_use]
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a short random hex tag (first 8 chars of a UUID v4).
#[must_use]
pub fn generate_tag() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
