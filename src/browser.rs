//! Browser capability behind the interactive login flow.
//!
//! The handshake needs only five operations, so they form a trait and the
//! WebDriver client stays swappable for a scripted page in tests.

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};

use crate::error::AuthError;

/// One browser page, alive for the duration of a single login.
#[async_trait]
pub trait BrowserPage: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), AuthError>;
    /// Type into the first input element on the page. The login forms render
    /// one field at a time, so "first input" is the stable selector.
    async fn fill_first_input(&mut self, value: &str) -> Result<(), AuthError>;
    /// Click the button or link carrying the given label text.
    async fn click_labeled(&mut self, label: &str) -> Result<(), AuthError>;
    async fn current_url(&mut self) -> Result<String, AuthError>;
    /// Release the underlying session. Called on every exit path.
    async fn close(&mut self) -> Result<(), AuthError>;
}

/// Acquires a fresh page per run.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserPage>, AuthError>;
}

/// WebDriver-backed launcher (chromedriver or any WebDriver endpoint).
pub struct WebDriverLauncher {
    webdriver_url: String,
}

impl WebDriverLauncher {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserPage>, AuthError> {
        let mut capabilities = serde_json::Map::new();
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            serde_json::json!({
                "args": ["--headless=new", "--no-sandbox", "--disable-dev-shm-usage"],
            }),
        );
        let client = ClientBuilder::rustls()
            .capabilities(capabilities)
            .connect(&self.webdriver_url)
            .await
            .map_err(|err| AuthError::Browser(format!("webdriver connect failed: {err}")))?;
        Ok(Box::new(WebDriverPage {
            client: Some(client),
        }))
    }
}

struct WebDriverPage {
    client: Option<Client>,
}

impl WebDriverPage {
    fn client(&mut self) -> Result<&mut Client, AuthError> {
        self.client
            .as_mut()
            .ok_or_else(|| AuthError::Browser("browser session already closed".to_string()))
    }
}

#[async_trait]
impl BrowserPage for WebDriverPage {
    async fn navigate(&mut self, url: &str) -> Result<(), AuthError> {
        self.client()?
            .goto(url)
            .await
            .map_err(|err| AuthError::Browser(err.to_string()))
    }

    async fn fill_first_input(&mut self, value: &str) -> Result<(), AuthError> {
        let input = self
            .client()?
            .find(Locator::Css("input"))
            .await
            .map_err(|err| AuthError::Browser(err.to_string()))?;
        input
            .send_keys(value)
            .await
            .map_err(|err| AuthError::Browser(err.to_string()))
    }

    async fn click_labeled(&mut self, label: &str) -> Result<(), AuthError> {
        let selector = format!(
            "//button[contains(normalize-space(.), '{label}')] \
             | //a[contains(normalize-space(.), '{label}')]"
        );
        let target = self
            .client()?
            .find(Locator::XPath(&selector))
            .await
            .map_err(|err| AuthError::Browser(err.to_string()))?;
        target
            .click()
            .await
            .map_err(|err| AuthError::Browser(err.to_string()))
    }

    async fn current_url(&mut self) -> Result<String, AuthError> {
        let url = self
            .client()?
            .current_url()
            .await
            .map_err(|err| AuthError::Browser(err.to_string()))?;
        Ok(url.to_string())
    }

    async fn close(&mut self) -> Result<(), AuthError> {
        if let Some(mut client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|err| AuthError::Browser(err.to_string()))?;
        }
        Ok(())
    }
}
