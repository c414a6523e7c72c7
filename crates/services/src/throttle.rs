use chrono::Duration;
use tracing::warn;

use circle8_core::Clock;
use circle8_core::model::{FailureOutcome, LockState};
use circle8_storage::NamespacedStore;

const LOCK_KEY: &str = "lock";

/// Result of checking the throttle gate before a credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Verification may proceed; `attempts` failures are on record.
    Open { attempts: u32 },
    /// Lockout active; reject without touching credentials or the counter.
    Locked { remaining: Duration },
}

impl Gate {
    #[must_use]
    pub fn allowed(&self) -> bool {
        matches!(self, Gate::Open { .. })
    }

    /// Seconds left in the lockout window, rounded up; zero when open.
    #[must_use]
    pub fn remaining_seconds(&self) -> i64 {
        match self {
            Gate::Open { .. } => 0,
            Gate::Locked { remaining } => (remaining.num_milliseconds() + 999) / 1000,
        }
    }
}

/// Failed-login throttle over the persisted `lock` record.
///
/// Every transition is written back immediately so the state survives a page
/// reload. Expiry is recomputed lazily on each check; no timer runs.
#[derive(Clone)]
pub struct AttemptThrottle {
    store: NamespacedStore,
    clock: Clock,
}

impl AttemptThrottle {
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

    /// Restore the persisted lock state; absent or corrupt reads as cleared.
    pub async fn state(&self) -> LockState {
        self.store.get_json(LOCK_KEY).await.unwrap_or_default()
    }

    /// Check whether a credential check may proceed right now.
    pub async fn check_gate(&self) -> Gate {
        let state = self.state().await;
        let now = self.clock.now();
        if state.is_locked(now) {
            Gate::Locked {
                remaining: state.remaining(now),
            }
        } else {
            Gate::Open {
                attempts: state.attempts(),
            }
        }
    }

    /// Count one failed credential check and persist the transition.
    ///
    /// Callers must have passed `check_gate` first; a rejected-while-locked
    /// attempt never reaches this method, so it never inflates the counter.
    pub async fn record_failure(&self) -> FailureOutcome {
        let mut state = self.state().await;
        let outcome = state.register_failure(self.clock.now());
        if let Err(err) = self.store.put_json(LOCK_KEY, &state).await {
            warn!(%err, "failed to persist lock state, continuing without it");
        }
        outcome
    }

    /// Clear the throttle after a successful credential check.
    pub async fn record_success(&self) {
        if let Err(err) = self.store.remove(LOCK_KEY).await {
            warn!(%err, "failed to clear lock state");
        }
    }
}
