//! Error taxonomy for the refresh flow.

use thiserror::Error;

/// Normalized errors across the secret store, login handshake, and token
/// exchange layers.
///
/// Only one condition is transient: a token-generation response without an
/// access token, which the session strategy retries. Everything else aborts
/// the run and leaves the previously stored token untouched.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("secret '{0}' not found")]
    SecretNotFound(String),
    #[error("access to secret '{name}' denied: {message}")]
    SecretAccessDenied { name: String, message: String },
    #[error("failed to write secret '{name}': {message}")]
    SecretWriteError { name: String, message: String },
    #[error("TOTP secret is not valid base32")]
    InvalidSecretFormat,
    #[error("consent request failed: {0}")]
    ConsentRequestFailed(String),
    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),
    #[error("login did not redirect in time; last seen URL: {last_url}")]
    RedirectTimeout { last_url: String },
    #[error("redirect URL carries no usable tokenId: {url}")]
    TokenIdMissing { url: String },
    #[error("no access token after {attempts} attempts")]
    AccessTokenRetriesExhausted { attempts: u32 },
    #[error("browser error: {0}")]
    Browser(String),
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}
