#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dhan_token_agent::auth::sdk::{SessionFactory, TokenGeneration, TokenSession};
use dhan_token_agent::browser::{BrowserLauncher, BrowserPage};
use dhan_token_agent::error::AuthError;
use dhan_token_agent::secrets::{CredentialBundle, SecretKeys, SecretStore};

// ---------------------------------------------------------------------------
// Secret store double
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemorySecretStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, name: &str, value: &str) {
        self.values
            .lock()
            .expect("store lock poisoned")
            .insert(name.to_string(), value.to_string());
    }

    pub fn get_value(&self, name: &str) -> Option<String> {
        self.values
            .lock()
            .expect("store lock poisoned")
            .get(name)
            .cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.lock().expect("store lock poisoned").clone()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get(&self, name: &str, _decrypt: bool) -> Result<String, AuthError> {
        self.get_value(name)
            .ok_or_else(|| AuthError::SecretNotFound(name.to_string()))
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), AuthError> {
        self.seed(name, value);
        Ok(())
    }
}

/// Store pre-loaded with every credential the refresher reads.
pub fn seeded_store() -> Arc<InMemorySecretStore> {
    let store = InMemorySecretStore::new();
    let keys = SecretKeys::default();
    store.seed(&keys.client_id, "1000000001");
    store.seed(&keys.api_key, "test-api-key");
    store.seed(&keys.api_secret, "test-api-secret");
    store.seed(&keys.totp_secret, "JBSWY3DPEHPK3PXP");
    store.seed(&keys.mobile, "9876543210");
    store.seed(&keys.pin, "4321");
    Arc::new(store)
}

pub fn bundle() -> CredentialBundle {
    CredentialBundle {
        client_id: "1000000001".to_string(),
        api_key: "test-api-key".to_string(),
        api_secret: "test-api-secret".to_string(),
        totp_secret: "JBSWY3DPEHPK3PXP".to_string(),
        mobile: "9876543210".to_string(),
        pin: "4321".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Token session double
// ---------------------------------------------------------------------------

pub fn token_generation(access_token: Option<&str>) -> TokenGeneration {
    TokenGeneration {
        access_token: access_token.map(str::to_string),
        message: None,
    }
}

/// Scripted vendor session: pops one response per call and records the
/// credentials each attempt presented.
#[derive(Default)]
pub struct FakeSession {
    responses: Mutex<VecDeque<Result<TokenGeneration, AuthError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeSession {
    pub fn scripted(responses: Vec<Result<TokenGeneration, AuthError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("call log poisoned").len()
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("call log poisoned").clone()
    }
}

pub struct SharedSession(pub Arc<FakeSession>);

#[async_trait]
impl TokenSession for SharedSession {
    async fn generate_token(
        &self,
        pin: &str,
        totp_code: &str,
    ) -> Result<TokenGeneration, AuthError> {
        self.0
            .calls
            .lock()
            .expect("call log poisoned")
            .push((pin.to_string(), totp_code.to_string()));
        self.0
            .responses
            .lock()
            .expect("response script poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                panic!("fake session called more times than scripted")
            })
    }
}

pub struct FakeSessionFactory(pub Arc<FakeSession>);

impl SessionFactory for FakeSessionFactory {
    fn bind(&self, _credentials: &CredentialBundle) -> Box<dyn TokenSession> {
        Box::new(SharedSession(self.0.clone()))
    }
}

// ---------------------------------------------------------------------------
// Browser double
// ---------------------------------------------------------------------------

/// Shared observable state for one scripted page.
#[derive(Default)]
pub struct PageState {
    pub navigated: Mutex<Vec<String>>,
    pub filled: Mutex<Vec<String>>,
    pub clicked: Mutex<Vec<String>>,
    /// Scripted `current_url` responses; the final entry repeats once the
    /// script is drained.
    pub urls: Mutex<VecDeque<String>>,
    pub closed: AtomicBool,
    pub fail_on_fill: AtomicBool,
}

impl PageState {
    pub fn with_urls(urls: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            urls: Mutex::new(urls.into_iter().map(str::to_string).collect()),
            ..Self::default()
        })
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigated.lock().expect("page state poisoned").clone()
    }

    pub fn fills(&self) -> Vec<String> {
        self.filled.lock().expect("page state poisoned").clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.clicked.lock().expect("page state poisoned").clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub struct FakePage(pub Arc<PageState>);

#[async_trait]
impl BrowserPage for FakePage {
    async fn navigate(&mut self, url: &str) -> Result<(), AuthError> {
        self.0
            .navigated
            .lock()
            .expect("page state poisoned")
            .push(url.to_string());
        Ok(())
    }

    async fn fill_first_input(&mut self, value: &str) -> Result<(), AuthError> {
        if self.0.fail_on_fill.load(Ordering::SeqCst) {
            return Err(AuthError::Browser("element not found: input".to_string()));
        }
        self.0
            .filled
            .lock()
            .expect("page state poisoned")
            .push(value.to_string());
        Ok(())
    }

    async fn click_labeled(&mut self, label: &str) -> Result<(), AuthError> {
        self.0
            .clicked
            .lock()
            .expect("page state poisoned")
            .push(label.to_string());
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, AuthError> {
        let mut urls = self.0.urls.lock().expect("page state poisoned");
        if urls.len() > 1 {
            Ok(urls.pop_front().expect("non-empty script"))
        } else {
            Ok(urls.front().cloned().unwrap_or_default())
        }
    }

    async fn close(&mut self) -> Result<(), AuthError> {
        self.0.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeLauncher(pub Arc<PageState>);

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserPage>, AuthError> {
        Ok(Box::new(FakePage(self.0.clone())))
    }
}
