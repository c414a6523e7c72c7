use chrono::Duration;

use circle8_core::Clock;
use circle8_core::model::{CredentialRecord, FailureOutcome, LOCK_MINUTES, Session};
use circle8_storage::NamespacedStore;

use crate::credentials::verify;
use crate::session::SessionIssuer;
use crate::throttle::{AttemptThrottle, Gate};

/// What one login submission produced. Each variant renders the toast text
/// the page shows for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched; a session is now active.
    Success(Session),
    /// Rejected by the throttle gate before any credential comparison.
    /// The failure counter did not move.
    Locked { remaining: Duration },
    /// This failure reached the threshold and started the lockout window.
    LockedOut,
    /// Credentials did not match; this many attempts remain.
    InvalidCredentials { attempts_left: u32 },
}

impl LoginOutcome {
    /// The transient message shown to the user for this outcome.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            LoginOutcome::Success(_) => "Welcome to Circle 8".to_string(),
            LoginOutcome::Locked { remaining } => {
                format!("Locked. Try again in {} min.", minutes_ceil(*remaining))
            }
            LoginOutcome::LockedOut => {
                format!("Too many attempts. Locked for {LOCK_MINUTES} minutes.")
            }
            LoginOutcome::InvalidCredentials { attempts_left } => {
                format!("Invalid credentials. Attempts left: {attempts_left}")
            }
        }
    }
}

fn minutes_ceil(duration: Duration) -> i64 {
    (duration.num_milliseconds() + 59_999) / 60_000
}

/// Orchestrates one login submission: throttle gate, credential check,
/// session issue, remember opt-in, lock bookkeeping.
#[derive(Clone)]
pub struct LoginFlow {
    throttle: AttemptThrottle,
    issuer: SessionIssuer,
    records: Vec<CredentialRecord>,
}

impl LoginFlow {
    /// Build a flow over a shared store and a resolved credential list
    /// (fetched or embedded, see `CredentialDirectory`).
    #[must_use]
    pub fn new(store: NamespacedStore, records: Vec<CredentialRecord>) -> Self {
        Self {
            throttle: AttemptThrottle::new(store.clone()),
            issuer: SessionIssuer::new(store),
            records,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.throttle = self.throttle.with_clock(clock);
        self.issuer = self.issuer.with_clock(clock);
        self
    }

    #[must_use]
    pub fn throttle(&self) -> &AttemptThrottle {
        &self.throttle
    }

    #[must_use]
    pub fn issuer(&self) -> &SessionIssuer {
        &self.issuer
    }

    /// Handle one submission of the login form.
    ///
    /// The identifier is trimmed the way the form does; the secret is taken
    /// verbatim. While locked, the attempt is rejected before any credential
    /// comparison and without consuming an attempt.
    pub async fn submit(
        &self,
        identifier: &str,
        secret: &str,
        remember_me: bool,
    ) -> LoginOutcome {
        if let Gate::Locked { remaining } = self.throttle.check_gate().await {
            return LoginOutcome::Locked { remaining };
        }

        let identifier = identifier.trim();
        if verify(identifier, secret, &self.records) {
            let session = self.issuer.login(identifier).await;
            if remember_me {
                self.issuer.remember(identifier).await;
            }
            self.throttle.record_success().await;
            LoginOutcome::Success(session)
        } else {
            match self.throttle.record_failure().await {
                FailureOutcome::LockedOut => LoginOutcome::LockedOut,
                FailureOutcome::AttemptsLeft(attempts_left) => {
                    LoginOutcome::InvalidCredentials { attempts_left }
                }
            }
        }
    }
}
