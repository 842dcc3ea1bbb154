//! Authentication API over the request gateway.

use async_trait::async_trait;
use pulse_domain::{EndpointRef, Outcome, Session, SyntheticIdentity};

use crate::ports::{AuthApi, Gateway};

/// Account creation endpoint.
pub const SIGNUP_PATH: &str = "auth/v1/signup";

/// Token endpoint; password login uses `grant_type=password`.
pub const TOKEN_PATH: &str = "auth/v1/token";

/// Session revocation endpoint.
pub const LOGOUT_PATH: &str = "auth/v1/logout";

/// [`AuthApi`] implemented with plain gateway calls.
///
/// Signup and login go out with the anonymous key as bearer; logout carries
/// the session token.
pub struct GatewayAuthApi<'a, G> {
    gateway: &'a G,
}

impl<'a, G: Gateway> GatewayAuthApi<'a, G> {
    /// Wraps a gateway.
    pub const fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<G: Gateway> AuthApi for GatewayAuthApi<'_, G> {
    async fn sign_up(&self, identity: &SyntheticIdentity) -> Outcome {
        let endpoint = EndpointRef::post(SIGNUP_PATH).json(identity.credentials());
        self.gateway.dispatch(endpoint, None).await
    }

    async fn sign_in(&self, identity: &SyntheticIdentity) -> Outcome {
        let endpoint = EndpointRef::post(TOKEN_PATH)
            .query("grant_type", "password")
            .json(identity.credentials());
        self.gateway.dispatch(endpoint, None).await
    }

    async fn sign_out(&self, session: &Session) -> Outcome {
        let endpoint = EndpointRef::post(LOGOUT_PATH);
        self.gateway
            .dispatch(endpoint, Some(session.access_token()))
            .await
    }
}
