//! Session-based token generation with bounded retry.
//!
//! The transient failure mode here is a response without an access token,
//! which in practice means the one-time code was stale or already consumed.
//! Each attempt therefore generates a fresh code, and the inter-attempt
//! delay spans at least one full code rotation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{AccessToken, Handshake};
use crate::error::AuthError;
use crate::secrets::CredentialBundle;
use crate::totp;
use crate::util::retry::{FixedRetry, RetryOutcome};

const DEFAULT_BASE_URL: &str = "https://auth.dhan.co";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Vendor session bound to one client identity, able to mint access tokens
/// from a PIN plus one-time code.
#[async_trait]
pub trait TokenSession: Send + Sync {
    async fn generate_token(
        &self,
        pin: &str,
        totp_code: &str,
    ) -> Result<TokenGeneration, AuthError>;
}

/// Binds a [`TokenSession`] to the run's credentials.
pub trait SessionFactory: Send + Sync {
    fn bind(&self, credentials: &CredentialBundle) -> Box<dyn TokenSession>;
}

/// Per-attempt result of a token-generation call. The token field is absent
/// when the service declined the attempt without a hard failure.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGeneration {
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// HTTP binding of the partner token endpoint.
pub struct HttpSessionFactory {
    base_url: String,
}

impl HttpSessionFactory {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpSessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactory for HttpSessionFactory {
    fn bind(&self, credentials: &CredentialBundle) -> Box<dyn TokenSession> {
        Box::new(HttpTokenSession {
            client: reqwest::Client::new(),
            base_url: self.base_url.clone(),
            client_id: credentials.client_id.clone(),
            api_key: credentials.api_key.clone(),
            api_secret: credentials.api_secret.clone(),
        })
    }
}

struct HttpTokenSession {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    api_key: String,
    api_secret: String,
}

#[async_trait]
impl TokenSession for HttpTokenSession {
    async fn generate_token(
        &self,
        pin: &str,
        totp_code: &str,
    ) -> Result<TokenGeneration, AuthError> {
        let url = format!("{}/partner/generate-token", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("app_id", &self.api_key)
            .header("app_secret", &self.api_secret)
            .json(&serde_json::json!({
                "client_id": self.client_id,
                "pin": pin,
                "totp": totp_code,
            }))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::TokenExchangeFailed(format!(
                "status {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|err| AuthError::TokenExchangeFailed(format!("malformed body: {err}")))
    }
}

/// Session-driven handshake: bind a session once, then attempt token
/// generation under the fixed-delay retry policy.
pub struct SdkHandshake {
    factory: Box<dyn SessionFactory>,
    retry: FixedRetry,
}

impl SdkHandshake {
    pub fn new(factory: Box<dyn SessionFactory>) -> Self {
        Self {
            factory,
            retry: FixedRetry::default(),
        }
    }

    pub fn with_retry(mut self, retry: FixedRetry) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl Handshake for SdkHandshake {
    async fn authenticate(
        &self,
        credentials: &CredentialBundle,
    ) -> Result<AccessToken, AuthError> {
        let session = self.factory.bind(credentials);
        let session = session.as_ref();
        let outcome = self
            .retry
            .run(|attempt| async move {
                let code = totp::generate(&credentials.totp_secret)?;
                tracing::info!(attempt, "requesting access token");
                let result = session.generate_token(&credentials.pin, &code).await?;
                if result.access_token.is_none() {
                    tracing::warn!(
                        attempt,
                        message = result.message.as_deref().unwrap_or("none"),
                        "token generation response carried no access token"
                    );
                }
                Ok::<_, AuthError>(result.access_token)
            })
            .await?;
        match outcome {
            RetryOutcome::Success { value, attempts } => {
                tracing::info!(attempts, "access token obtained");
                Ok(AccessToken::new(value))
            }
            RetryOutcome::Exhausted { attempts } => {
                Err(AuthError::AccessTokenRetriesExhausted { attempts })
            }
        }
    }
}
