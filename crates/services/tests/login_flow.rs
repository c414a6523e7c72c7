use std::sync::Arc;

use chrono::Duration;
use circle8_core::Clock;
use circle8_core::model::{CredentialRecord, MAX_ATTEMPTS};
use circle8_core::time::{fixed_clock, fixed_now};
use circle8_services::credentials::sha256_hex;
use circle8_services::login::{LoginFlow, LoginOutcome};
use circle8_storage::{MemoryStore, NamespacedStore};

fn records() -> Vec<CredentialRecord> {
    vec![CredentialRecord::new("veinarous", sha256_hex("open sesame"))]
}

fn flow_over(store: NamespacedStore, clock: Clock) -> LoginFlow {
    LoginFlow::new(store, records()).with_clock(clock)
}

fn flow() -> LoginFlow {
    flow_over(
        NamespacedStore::new(Arc::new(MemoryStore::new())),
        fixed_clock(),
    )
}

#[tokio::test]
async fn successful_login_issues_a_session() {
    let flow = flow();
    let outcome = flow.submit("veinarous", "open sesame", false).await;

    let LoginOutcome::Success(session) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(session.identifier(), "veinarous");
    assert_eq!(flow.issuer().current().await, Some(session));
    assert_eq!(flow.issuer().remembered().await, None);
}

#[tokio::test]
async fn identifier_is_trimmed_secret_is_not() {
    let flow = flow();
    assert!(matches!(
        flow.submit("  veinarous  ", "open sesame", false).await,
        LoginOutcome::Success(_)
    ));
    assert!(matches!(
        flow.submit("veinarous", " open sesame", false).await,
        LoginOutcome::InvalidCredentials { .. }
    ));
}

#[tokio::test]
async fn remember_me_persists_the_identifier() {
    let flow = flow();
    flow.submit("veinarous", "open sesame", true).await;
    assert_eq!(flow.issuer().remembered().await, Some("veinarous".to_string()));
}

#[tokio::test]
async fn failures_count_down_then_lock() {
    let flow = flow();

    for expected_left in (1..MAX_ATTEMPTS).rev() {
        let outcome = flow.submit("veinarous", "wrong", false).await;
        assert_eq!(
            outcome,
            LoginOutcome::InvalidCredentials {
                attempts_left: expected_left
            }
        );
    }

    let outcome = flow.submit("veinarous", "wrong", false).await;
    assert_eq!(outcome, LoginOutcome::LockedOut);
}

#[tokio::test]
async fn correct_credentials_during_lock_are_rejected_without_counting() {
    let flow = flow();
    for _ in 0..MAX_ATTEMPTS {
        flow.submit("veinarous", "wrong", false).await;
    }

    // A correct pair submitted inside the lock window gets the lock message,
    // not a credential-mismatch message, and moves nothing.
    let outcome = flow.submit("veinarous", "open sesame", false).await;
    assert!(matches!(outcome, LoginOutcome::Locked { .. }));
    assert_eq!(outcome.user_message(), "Locked. Try again in 10 min.");
    assert_eq!(flow.throttle().state().await.attempts(), MAX_ATTEMPTS);
    assert_eq!(flow.issuer().current().await, None);
}

#[tokio::test]
async fn lock_expires_and_login_succeeds_afterwards() {
    let store = NamespacedStore::new(Arc::new(MemoryStore::new()));
    let flow = flow_over(store.clone(), fixed_clock());
    for _ in 0..MAX_ATTEMPTS {
        flow.submit("veinarous", "wrong", false).await;
    }

    let after = Clock::fixed(fixed_now() + Duration::minutes(10));
    let flow = flow_over(store, after);
    let outcome = flow.submit("veinarous", "open sesame", false).await;
    assert!(matches!(outcome, LoginOutcome::Success(_)));

    // Success clears the throttle entirely.
    assert_eq!(flow.throttle().state().await.attempts(), 0);
}

#[tokio::test]
async fn success_resets_attempts_regardless_of_prior_count() {
    let flow = flow();
    for _ in 0..3 {
        flow.submit("veinarous", "wrong", false).await;
    }

    flow.submit("veinarous", "open sesame", false).await;
    assert_eq!(flow.throttle().state().await.attempts(), 0);

    // The next failure starts counting from scratch.
    let outcome = flow.submit("veinarous", "wrong", false).await;
    assert_eq!(
        outcome,
        LoginOutcome::InvalidCredentials {
            attempts_left: MAX_ATTEMPTS - 1
        }
    );
}

#[tokio::test]
async fn lock_state_survives_a_reload() {
    let store = NamespacedStore::new(Arc::new(MemoryStore::new()));
    let flow = flow_over(store.clone(), fixed_clock());
    for _ in 0..MAX_ATTEMPTS {
        flow.submit("veinarous", "wrong", false).await;
    }

    // Same store, fresh flow: the page was reloaded.
    let reloaded = flow_over(store, fixed_clock());
    let outcome = reloaded.submit("veinarous", "open sesame", false).await;
    assert!(matches!(outcome, LoginOutcome::Locked { .. }));
}

#[tokio::test]
async fn embedded_fallback_list_still_authenticates() {
    // When users.json cannot be fetched the embedded list takes over; a flow
    // built over it must authenticate a matching pair. The known record's
    // secret is not in the repo, so prove it structurally: the flow accepts
    // exactly the pairs whose digest matches the list it was given.
    let embedded = circle8_services::credentials::embedded_directory();
    let store = NamespacedStore::new(Arc::new(MemoryStore::new()));
    let flow = LoginFlow::new(store, embedded.clone()).with_clock(fixed_clock());

    assert!(matches!(
        flow.submit("veinarous", "not the real secret", false).await,
        LoginOutcome::InvalidCredentials { .. }
    ));
    assert_eq!(
        embedded[0].digest,
        "7507fa0c4969976e4baacf589f16e908faa2ba3aa6649051e7e608175b3dd823"
    );
}
