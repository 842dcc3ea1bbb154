//! Application use cases (verification steps and their orchestration).

mod bootstrap_session;
mod end_session;
mod probe_access;
mod probe_connectivity;
mod run_suite;
mod verify_resource;

pub use bootstrap_session::*;
pub use end_session::*;
pub use probe_access::*;
pub use probe_connectivity::*;
pub use run_suite::*;
pub use verify_resource::*;

use std::time::Instant;

/// Milliseconds since `start`, saturating.
fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
