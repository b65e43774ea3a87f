//! Runtime configuration, resolved from the environment with production
//! defaults.

use std::str::FromStr;
use std::time::Duration;

use crate::secrets::SecretKeys;

/// Which handshake drives the login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Browser-driven consent login.
    Interactive,
    /// Session-based token generation with retry.
    Sdk,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "interactive" | "browser" => Ok(Self::Interactive),
            "sdk" | "session" => Ok(Self::Sdk),
            other => Err(format!(
                "unknown strategy '{other}' (expected 'interactive' or 'sdk')"
            )),
        }
    }
}

/// Configuration for one refresh run.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub strategy: StrategyKind,
    pub aws_region: String,
    pub webdriver_url: String,
    pub auth_base_url: String,
    pub keys: SecretKeys,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Interactive,
            aws_region: "ap-south-1".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            auth_base_url: "https://auth.dhan.co".to_string(),
            keys: SecretKeys::default(),
            max_retries: 3,
            retry_delay: Duration::from_secs(120),
        }
    }
}

impl RefreshConfig {
    /// Load from `DHAN_*` environment variables (reading `.env` first),
    /// falling back to the defaults above. Unparseable values are skipped
    /// with a warning rather than aborting the run.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        if let Ok(value) = std::env::var("DHAN_STRATEGY") {
            match value.parse() {
                Ok(strategy) => config.strategy = strategy,
                Err(message) => tracing::warn!(%message, "ignoring DHAN_STRATEGY"),
            }
        }
        if let Ok(value) = std::env::var("AWS_REGION") {
            config.aws_region = value;
        }
        if let Ok(value) = std::env::var("DHAN_WEBDRIVER_URL") {
            config.webdriver_url = value;
        }
        if let Ok(value) = std::env::var("DHAN_AUTH_BASE_URL") {
            config.auth_base_url = value;
        }
        if let Ok(value) = std::env::var("DHAN_MAX_RETRIES") {
            match value.parse() {
                Ok(max_retries) => config.max_retries = max_retries,
                Err(_) => tracing::warn!(%value, "ignoring non-numeric DHAN_MAX_RETRIES"),
            }
        }
        if let Ok(value) = std::env::var("DHAN_RETRY_DELAY_SECS") {
            match value.parse() {
                Ok(secs) => config.retry_delay = Duration::from_secs(secs),
                Err(_) => tracing::warn!(%value, "ignoring non-numeric DHAN_RETRY_DELAY_SECS"),
            }
        }
        config
    }
}
