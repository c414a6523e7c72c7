use rand::RngCore;
use tracing::warn;

use circle8_core::Clock;
use circle8_core::model::{RememberedIdentity, Session};
use circle8_storage::NamespacedStore;

const SESSION_KEY: &str = "session";
const REMEMBER_KEY: &str = "remember";

/// Mints and persists the device-local session record, and manages the
/// independent "remembered identity" used to prefill the login form.
#[derive(Clone)]
pub struct SessionIssuer {
    store: NamespacedStore,
    clock: Clock,
}

/// Generate a session token from the thread-local CSPRNG: four random `u32`
/// values joined with `-`, the format the site has always stored. Uniqueness
/// is not verified; the token only marks a logged-in identity on this device.
#[must_use]
pub fn mint_token() -> String {
    let mut rng = rand::rng();
    let parts: Vec<String> = (0..4).map(|_| rng.next_u32().to_string()).collect();
    parts.join("-")
}

impl SessionIssuer {
    #[must_use]
    pub fn new(store: NamespacedStore) -> Self {
        Self {
            store,
            clock: Clock::default_clock(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Mint a fresh session for `identifier`, overwriting any prior session.
    pub async fn login(&self, identifier: &str) -> Session {
        let session = Session::new(identifier, mint_token(), self.clock.now());
        if let Err(err) = self.store.put_json(SESSION_KEY, &session).await {
            warn!(%err, "failed to persist session");
        }
        session
    }

    /// Remove the persisted session. The remembered identity is untouched.
    pub async fn logout(&self) {
        if let Err(err) = self.store.remove(SESSION_KEY).await {
            warn!(%err, "failed to remove session");
        }
    }

    /// The active session, if a login succeeded earlier on this device.
    pub async fn current(&self) -> Option<Session> {
        self.store.get_json(SESSION_KEY).await
    }

    /// Persist the identifier for prefill on a later visit (opt-in).
    pub async fn remember(&self, identifier: &str) {
        let record = RememberedIdentity::new(identifier);
        if let Err(err) = self.store.put_json(REMEMBER_KEY, &record).await {
            warn!(%err, "failed to persist remembered identity");
        }
    }

    /// Previously remembered identifier, if any.
    pub async fn remembered(&self) -> Option<String> {
        self.store
            .get_json::<RememberedIdentity>(REMEMBER_KEY)
            .await
            .map(|record| record.identifier().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circle8_core::time::{fixed_clock, fixed_now};
    use circle8_storage::MemoryStore;
    use std::sync::Arc;

    fn issuer() -> SessionIssuer {
        let store = NamespacedStore::new(Arc::new(MemoryStore::new()));
        SessionIssuer::new(store).with_clock(fixed_clock())
    }

    #[test]
    fn token_is_four_numeric_groups() {
        let token = mint_token();
        let parts: Vec<&str> = token.split('-').collect();
        assert_eq!(parts.len(), 4);
        for part in parts {
            part.parse::<u32>().expect("token group should be a u32");
        }
    }

    #[test]
    fn tokens_differ_between_mints() {
        // Sixteen random bytes colliding would mean the RNG is broken.
        assert_ne!(mint_token(), mint_token());
    }

    #[tokio::test]
    async fn login_persists_and_reads_back() {
        let issuer = issuer();
        let session = issuer.login("veinarous").await;

        assert_eq!(session.identifier(), "veinarous");
        assert_eq!(session.created_at(), fixed_now());
        assert_eq!(issuer.current().await, Some(session));
    }

    #[tokio::test]
    async fn login_overwrites_prior_session() {
        let issuer = issuer();
        let first = issuer.login("first").await;
        let second = issuer.login("second").await;

        let current = issuer.current().await.unwrap();
        assert_eq!(current, second);
        assert_ne!(current.token(), first.token());
    }

    #[tokio::test]
    async fn logout_leaves_remembered_identity_alone() {
        let issuer = issuer();
        issuer.login("veinarous").await;
        issuer.remember("veinarous").await;

        issuer.logout().await;
        assert_eq!(issuer.current().await, None);
        assert_eq!(issuer.remembered().await, Some("veinarous".to_string()));
    }

    #[tokio::test]
    async fn remembered_is_absent_until_opted_in() {
        let issuer = issuer();
        issuer.login("veinarous").await;
        assert_eq!(issuer.remembered().await, None);
    }
}
