//! AWS SSM Parameter Store adapter.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::types::ParameterType;

use super::SecretStore;
use crate::error::AuthError;

/// [`SecretStore`] backed by SSM Parameter Store.
///
/// Reads use `GetParameter` with optional decryption; writes use
/// `PutParameter` as a `SecureString` with overwrite enabled, matching the
/// rotation model where each run replaces the stored token wholesale.
pub struct SsmParameterStore {
    client: aws_sdk_ssm::Client,
}

impl SsmParameterStore {
    /// Connect with the default AWS credential chain and the given region.
    pub async fn connect(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;
        Self {
            client: aws_sdk_ssm::Client::new(&config),
        }
    }

    pub fn from_client(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SsmParameterStore {
    async fn get(&self, name: &str, decrypt: bool) -> Result<String, AuthError> {
        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(decrypt)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_parameter_not_found() {
                    AuthError::SecretNotFound(name.to_string())
                } else {
                    AuthError::SecretAccessDenied {
                        name: name.to_string(),
                        message: service_err.to_string(),
                    }
                }
            })?;
        output
            .parameter
            .and_then(|parameter| parameter.value)
            .ok_or_else(|| AuthError::SecretNotFound(name.to_string()))
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), AuthError> {
        self.client
            .put_parameter()
            .name(name)
            .value(value)
            .r#type(ParameterType::SecureString)
            .overwrite(true)
            .send()
            .await
            .map_err(|err| AuthError::SecretWriteError {
                name: name.to_string(),
                message: err.into_service_error().to_string(),
            })?;
        Ok(())
    }
}
