//! Browser-driven consent login.
//!
//! Walks the hosted login forms (mobile, TOTP, PIN) in a headless browser,
//! waits for the post-login redirect, and exchanges the redirect's token id
//! for an access token. Failures here are structural, so there is no retry
//! wrapper: replaying minutes of form interaction does not cure a changed
//! form or a rejected credential.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use super::{AccessToken, Handshake};
use crate::browser::{BrowserLauncher, BrowserPage};
use crate::consent::ConsentClient;
use crate::error::AuthError;
use crate::secrets::CredentialBundle;
use crate::totp;

/// Timing knobs for the interactive flow.
#[derive(Debug, Clone)]
pub struct InteractiveTiming {
    /// Wait after each form submission for the next form to render. The
    /// login pages render asynchronously and expose no ready signal, so a
    /// fixed settle period is the only synchronization available.
    pub settle: Duration,
    /// How often the redirect poll samples the current URL.
    pub poll_interval: Duration,
    /// Deadline for the post-PIN redirect.
    pub redirect_deadline: Duration,
}

impl Default for InteractiveTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1500),
            poll_interval: Duration::from_millis(500),
            redirect_deadline: Duration::from_secs(30),
        }
    }
}

pub struct InteractiveHandshake {
    consent: ConsentClient,
    launcher: Box<dyn BrowserLauncher>,
    timing: InteractiveTiming,
}

impl InteractiveHandshake {
    pub fn new(consent: ConsentClient, launcher: Box<dyn BrowserLauncher>) -> Self {
        Self {
            consent,
            launcher,
            timing: InteractiveTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: InteractiveTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Walk the login forms through to the redirect and return the token id.
    async fn drive_login(
        &self,
        page: &mut dyn BrowserPage,
        credentials: &CredentialBundle,
        login_url: &str,
    ) -> Result<String, AuthError> {
        tracing::info!("opening consent login page");
        page.navigate(login_url).await?;

        page.fill_first_input(&credentials.mobile).await?;
        page.click_labeled("Proceed").await?;
        tokio::time::sleep(self.timing.settle).await;

        let code = totp::generate(&credentials.totp_secret)?;
        page.fill_first_input(&code).await?;
        page.click_labeled("Proceed").await?;
        tokio::time::sleep(self.timing.settle).await;

        page.fill_first_input(&credentials.pin).await?;
        page.click_labeled("Proceed").await?;
        tokio::time::sleep(self.timing.settle).await;

        let redirected = wait_for_redirect(
            page,
            self.timing.poll_interval,
            self.timing.redirect_deadline,
        )
        .await?;
        tracing::info!(url = %redirected, "login redirect completed");
        extract_token_id(&redirected).ok_or(AuthError::TokenIdMissing { url: redirected })
    }
}

#[async_trait]
impl Handshake for InteractiveHandshake {
    async fn authenticate(
        &self,
        credentials: &CredentialBundle,
    ) -> Result<AccessToken, AuthError> {
        let consent_app_id = self
            .consent
            .request_consent(
                &credentials.client_id,
                &credentials.api_key,
                &credentials.api_secret,
            )
            .await?;
        let login_url = self.consent.login_url(&consent_app_id);

        let mut page = self.launcher.launch().await?;
        let outcome = self.drive_login(page.as_mut(), credentials, &login_url).await;
        // The session is released before the outcome is inspected so no exit
        // path leaks the browser.
        if let Err(close_err) = page.close().await {
            tracing::warn!(error = %close_err, "failed to close browser session");
        }
        let token_id = outcome?;

        let token = self
            .consent
            .exchange_token(&token_id, &credentials.api_key, &credentials.api_secret)
            .await?;
        Ok(AccessToken::new(token))
    }
}

/// Sample the page URL at a fixed interval until it carries a `tokenId`
/// parameter or the deadline passes. On timeout the last observed URL is
/// reported for diagnosis.
async fn wait_for_redirect(
    page: &mut dyn BrowserPage,
    interval: Duration,
    deadline: Duration,
) -> Result<String, AuthError> {
    let started = tokio::time::Instant::now();
    loop {
        let url = page.current_url().await?;
        if url.contains("tokenId=") {
            return Ok(url);
        }
        if started.elapsed() >= deadline {
            tracing::error!(url = %url, "redirect did not complete before deadline");
            return Err(AuthError::RedirectTimeout { last_url: url });
        }
        tokio::time::sleep(interval).await;
    }
}

/// Pull the token id out of a redirect URL. The redirect shape is loosely
/// specified, so the id itself is matched strictly (hex with dashes) even
/// after the broader `tokenId=` marker has been seen.
fn extract_token_id(url: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"tokenId=([a-f0-9-]+)").expect("token id pattern must compile"));
    pattern.captures(url).map(|captures| captures[1].to_string())
}
