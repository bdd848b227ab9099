//! Identity operations delegated to the platform credential service
//!
//! The facade never inspects or signs tokens itself: verification and
//! minting are one-call delegations to the platform's credential endpoints.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::platform::{ApiClient, ApiError};

/// Identity errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential is expired, malformed, or revoked
    #[error("Invalid credential: {0}")]
    InvalidToken(String),

    #[error("Identity not found: {0}")]
    NotFound(String),

    #[error("Platform error: {0}")]
    Backend(#[from] ApiError),
}

/// An authenticated end-user account, as reported by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

#[derive(Serialize)]
struct VerifyTokenRequest<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct MintTokenRequest<'a> {
    uid: &'a str,
}

#[derive(Deserialize)]
struct MintTokenResponse {
    token: String,
}

/// Client for the platform's credential-verification endpoints
#[derive(Clone)]
pub struct IdentityClient {
    api: Arc<ApiClient>,
}

impl IdentityClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        IdentityClient { api }
    }

    /// Verify a bearer ID token and return the identity it encodes
    ///
    /// Expired, malformed, and revoked tokens all map to
    /// [`AuthError::InvalidToken`]; transport and service failures map to
    /// [`AuthError::Backend`].
    pub async fn verify_token(&self, id_token: &str) -> Result<Identity, AuthError> {
        let request = VerifyTokenRequest { token: id_token };

        match self
            .api
            .post_json::<_, Identity>("/v1/tokens:verify", &request)
            .await
        {
            Ok(identity) => {
                debug!(uid = %identity.uid, "Verified ID token");
                Ok(identity)
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Token verification failed: {}", e);
                Err(AuthError::InvalidToken(e.to_string()))
            }
            Err(e) => Err(AuthError::Backend(e)),
        }
    }

    /// Fetch an identity profile by uid
    pub async fn get_identity(&self, uid: &str) -> Result<Identity, AuthError> {
        match self
            .api
            .get_json::<Identity>(&format!("/v1/identities/{}", uid))
            .await
        {
            Ok(identity) => Ok(identity),
            Err(e) if e.is_not_found() => Err(AuthError::NotFound(uid.to_string())),
            Err(e) => Err(AuthError::Backend(e)),
        }
    }

    /// Mint a delegated sign-in token for server-to-client flows
    pub async fn mint_custom_token(&self, uid: &str) -> Result<String, AuthError> {
        let request = MintTokenRequest { uid };
        let response: MintTokenResponse = self.api.post_json("/v1/tokens:mint", &request).await?;
        Ok(response.token)
    }
}
