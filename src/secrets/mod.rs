//! Secret storage seam and the credential bundle loaded through it.

pub mod ssm;

use std::fmt;

use async_trait::async_trait;

use crate::error::AuthError;

/// Remote secret storage. Every call is an independent round-trip; nothing
/// is cached locally.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a named secret, optionally decrypting it in the store.
    async fn get(&self, name: &str, decrypt: bool) -> Result<String, AuthError>;
    /// Write a secret encrypted at rest, overwriting any prior value.
    async fn put(&self, name: &str, value: &str) -> Result<(), AuthError>;
}

/// Parameter names for every secret this tool reads or writes.
#[derive(Debug, Clone)]
pub struct SecretKeys {
    pub client_id: String,
    pub api_key: String,
    pub api_secret: String,
    pub totp_secret: String,
    pub mobile: String,
    pub pin: String,
    pub access_token: String,
}

impl Default for SecretKeys {
    fn default() -> Self {
        Self {
            client_id: "/dhan/client_id".to_string(),
            api_key: "/dhan/api_key".to_string(),
            api_secret: "/dhan/api_secret".to_string(),
            totp_secret: "/dhan/totp".to_string(),
            mobile: "/dhan/mobile".to_string(),
            pin: "/dhan/pin".to_string(),
            access_token: "/dhan/access_token".to_string(),
        }
    }
}

/// Login credentials for one refresh run.
///
/// Fetched once at startup and held for the lifetime of the process. The
/// secret-bearing fields are elided from `Debug` output.
#[derive(Clone)]
pub struct CredentialBundle {
    pub client_id: String,
    pub api_key: String,
    pub api_secret: String,
    pub totp_secret: String,
    pub mobile: String,
    pub pin: String,
}

impl CredentialBundle {
    /// Load every credential from the store. A missing or unreadable
    /// parameter aborts the run before any auth-service traffic.
    pub async fn load(store: &dyn SecretStore, keys: &SecretKeys) -> Result<Self, AuthError> {
        Ok(Self {
            client_id: store.get(&keys.client_id, false).await?,
            api_key: store.get(&keys.api_key, true).await?,
            api_secret: store.get(&keys.api_secret, true).await?,
            totp_secret: store.get(&keys.totp_secret, true).await?,
            mobile: store.get(&keys.mobile, false).await?,
            pin: store.get(&keys.pin, true).await?,
        })
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("client_id", &self.client_id)
            .field("mobile", &self.mobile)
            .field("api_key", &"..")
            .field("api_secret", &"..")
            .field("totp_secret", &"..")
            .field("pin", &"..")
            .finish()
    }
}
