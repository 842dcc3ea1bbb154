//! Response-side domain types.

mod outcome;
mod status;

pub use outcome::Outcome;
pub use status::StatusCode;
