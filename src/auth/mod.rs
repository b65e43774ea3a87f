//! Login handshake strategies producing an access token.

pub mod interactive;
pub mod sdk;

use std::fmt;

use async_trait::async_trait;

pub use interactive::{InteractiveHandshake, InteractiveTiming};
pub use sdk::{HttpSessionFactory, SdkHandshake, SessionFactory, TokenSession};

use crate::error::AuthError;
use crate::secrets::CredentialBundle;

/// Bearer credential produced by a successful handshake.
///
/// The raw value is only reachable through [`AccessToken::reveal`] and is
/// elided from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token, for transport to the secret store.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// One authentication strategy, selected by deployment configuration.
///
/// Implementations drive the full login flow and return the final token;
/// retry policy is internal to each strategy.
#[async_trait]
pub trait Handshake: Send + Sync {
    async fn authenticate(&self, credentials: &CredentialBundle)
        -> Result<AccessToken, AuthError>;
}
