//! Request gateway port

use async_trait::async_trait;
use pulse_domain::{EndpointRef, Outcome};

/// Port for dispatching one request against the backend.
///
/// Implementations resolve the endpoint against the right API family, attach
/// the `apikey` and bearer headers, and classify the response. They never
/// fail: transport problems come back as [`Outcome::Failure`].
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Dispatches a request.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The endpoint, method, query and body
    /// * `bearer` - Session token; `None` sends the anonymous key
    async fn dispatch(&self, endpoint: EndpointRef, bearer: Option<&str>) -> Outcome;

    /// Human-readable backend location, for reports.
    fn target(&self) -> String;
}
