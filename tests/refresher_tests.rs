//! End-to-end refresh runs against in-memory collaborators.

mod support;

use std::time::Duration;

use dhan_token_agent::auth::SdkHandshake;
use dhan_token_agent::error::AuthError;
use dhan_token_agent::refresher::TokenRefresher;
use dhan_token_agent::secrets::SecretKeys;
use dhan_token_agent::util::retry::FixedRetry;

use support::{seeded_store, token_generation, FakeSession, FakeSessionFactory};

fn handshake(session: std::sync::Arc<FakeSession>) -> Box<SdkHandshake> {
    Box::new(
        SdkHandshake::new(Box::new(FakeSessionFactory(session))).with_retry(FixedRetry {
            max_attempts: 3,
            delay: Duration::from_secs(120),
        }),
    )
}

#[tokio::test(start_paused = true)]
async fn successful_run_persists_the_token_and_nothing_else() {
    let store = seeded_store();
    let keys = SecretKeys::default();
    let before = store.snapshot();
    let session = FakeSession::scripted(vec![Ok(token_generation(Some("fresh-token")))]);

    TokenRefresher::new(store.clone(), handshake(session), keys.clone())
        .run()
        .await
        .expect("run");

    assert_eq!(
        store.get_value(&keys.access_token).as_deref(),
        Some("fresh-token")
    );
    let mut after = store.snapshot();
    after.remove(&keys.access_token);
    assert_eq!(after, before, "no other stored secret changed");
}

#[tokio::test(start_paused = true)]
async fn overwrite_replaces_a_previously_stored_token() {
    let store = seeded_store();
    let keys = SecretKeys::default();
    store.seed(&keys.access_token, "stale-token");
    let session = FakeSession::scripted(vec![Ok(token_generation(Some("fresh-token")))]);

    TokenRefresher::new(store.clone(), handshake(session), keys.clone())
        .run()
        .await
        .expect("run");

    assert_eq!(
        store.get_value(&keys.access_token).as_deref(),
        Some("fresh-token")
    );
}

#[tokio::test(start_paused = true)]
async fn failed_handshake_leaves_the_store_untouched() {
    let store = seeded_store();
    let keys = SecretKeys::default();
    store.seed(&keys.access_token, "stale-token");
    let before = store.snapshot();
    let session = FakeSession::scripted(vec![
        Ok(token_generation(None)),
        Ok(token_generation(None)),
        Ok(token_generation(None)),
    ]);

    let result = TokenRefresher::new(store.clone(), handshake(session), keys.clone())
        .run()
        .await;

    assert!(matches!(
        result,
        Err(AuthError::AccessTokenRetriesExhausted { attempts: 3 })
    ));
    assert_eq!(store.snapshot(), before, "failure must not write anything");
    assert_eq!(
        store.get_value(&keys.access_token).as_deref(),
        Some("stale-token")
    );
}

#[tokio::test(start_paused = true)]
async fn missing_secret_aborts_before_any_login_attempt() {
    let store = support::InMemorySecretStore::new();
    let keys = SecretKeys::default();
    store.seed(&keys.client_id, "1000000001");
    // Every other credential is absent.
    let store = std::sync::Arc::new(store);
    let session = FakeSession::scripted(vec![]);

    let result = TokenRefresher::new(store.clone(), handshake(session.clone()), keys)
        .run()
        .await;

    assert!(matches!(result, Err(AuthError::SecretNotFound(_))));
    assert_eq!(session.call_count(), 0);
}
