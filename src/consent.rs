//! Consent and token-exchange calls against the Dhan auth service.

use std::time::Duration;

use serde::Deserialize;

use crate::error::AuthError;

const DEFAULT_BASE_URL: &str = "https://auth.dhan.co";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the two-call consent protocol: create a consent session, then
/// trade a completed session's token id for an access token.
///
/// No retries at this layer; transient handling belongs to the handshake
/// driver.
pub struct ConsentClient {
    client: reqwest::Client,
    base_url: String,
}

impl ConsentClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different auth-service root (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Request a consent session for the client id. The returned id is only
    /// meaningful to the key pair that created it.
    pub async fn request_consent(
        &self,
        client_id: &str,
        api_key: &str,
        api_secret: &str,
    ) -> Result<String, AuthError> {
        let url = format!("{}/app/generate-consent?client_id={client_id}", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("app_id", api_key)
            .header("app_secret", api_secret)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::ConsentRequestFailed(format!(
                "status {}",
                response.status()
            )));
        }
        let payload: ConsentResponse = response
            .json()
            .await
            .map_err(|err| AuthError::ConsentRequestFailed(format!("malformed body: {err}")))?;
        payload.consent_app_id.ok_or_else(|| {
            AuthError::ConsentRequestFailed("response missing consentAppId".to_string())
        })
    }

    /// Build the interactive login URL for a consent session.
    pub fn login_url(&self, consent_app_id: &str) -> String {
        format!(
            "{}/login/consentApp-login?consentAppId={consent_app_id}",
            self.base_url
        )
    }

    /// Exchange a redirect token id for the access token. The id is
    /// single-use: the service consumes it whether or not the caller keeps
    /// the result.
    pub async fn exchange_token(
        &self,
        token_id: &str,
        api_key: &str,
        api_secret: &str,
    ) -> Result<String, AuthError> {
        let url = format!("{}/app/consumeApp-consent?tokenId={token_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("app_id", api_key)
            .header("app_secret", api_secret)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::TokenExchangeFailed(format!(
                "status {}",
                response.status()
            )));
        }
        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|err| AuthError::TokenExchangeFailed(format!("malformed body: {err}")))?;
        payload.access_token.ok_or_else(|| {
            AuthError::TokenExchangeFailed("response missing accessToken".to_string())
        })
    }
}

impl Default for ConsentClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ConsentResponse {
    #[serde(rename = "consentAppId")]
    consent_app_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}
