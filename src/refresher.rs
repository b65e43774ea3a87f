//! End-to-end refresh run: load credentials, authenticate, persist.

use std::sync::Arc;

use crate::auth::Handshake;
use crate::error::AuthError;
use crate::secrets::{CredentialBundle, SecretKeys, SecretStore};

/// One refresh run over injected collaborators.
///
/// Nothing is written on failure; the previously stored token stays intact
/// until a handshake has fully succeeded.
pub struct TokenRefresher {
    store: Arc<dyn SecretStore>,
    handshake: Box<dyn Handshake>,
    keys: SecretKeys,
}

impl TokenRefresher {
    pub fn new(store: Arc<dyn SecretStore>, handshake: Box<dyn Handshake>, keys: SecretKeys) -> Self {
        Self {
            store,
            handshake,
            keys,
        }
    }

    pub async fn run(&self) -> Result<(), AuthError> {
        tracing::info!("loading credentials from the parameter store");
        let credentials = CredentialBundle::load(self.store.as_ref(), &self.keys).await?;

        let token = self.handshake.authenticate(&credentials).await?;

        self.store
            .put(&self.keys.access_token, token.reveal())
            .await?;
        tracing::info!(key = %self.keys.access_token, "access token updated");
        Ok(())
    }
}
