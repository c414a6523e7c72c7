use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Failed attempts allowed before the lockout engages.
pub const MAX_ATTEMPTS: u32 = 5;

/// Length of the lockout window, in minutes.
pub const LOCK_MINUTES: i64 = 10;

/// Outcome of registering one failed credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Still below the threshold; this many attempts remain.
    AttemptsLeft(u32),
    /// The threshold was reached and the lockout window is now active.
    LockedOut,
}

/// Persisted login-throttle state.
///
/// `until` is an epoch-millisecond timestamp, `0` meaning "not locked" — the
/// same JSON shape the site has always stored under its `lock` key. Expiry is
/// lazy: there is no timer, a lock simply stops matching once the wall clock
/// passes `until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockState {
    #[serde(default)]
    attempts: u32,
    #[serde(default)]
    until: i64,
}

impl LockState {
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Instant the lockout expires, if one is active at `now`.
    #[must_use]
    pub fn locked_until(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.is_locked(now) {
            DateTime::<Utc>::from_timestamp_millis(self.until)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() < self.until
    }

    /// Time left in the lockout window, zero when not locked.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        if self.is_locked(now) {
            Duration::milliseconds(self.until - now.timestamp_millis())
        } else {
            Duration::zero()
        }
    }

    /// Register one failed credential check at `now`.
    ///
    /// Callers must gate on `is_locked` first: failures are only counted
    /// while the lockout is inactive, so a rejected-while-locked attempt
    /// never moves the counter. The counter saturates at the threshold, and
    /// reaching it starts a fresh lockout window.
    pub fn register_failure(&mut self, now: DateTime<Utc>) -> FailureOutcome {
        self.attempts = (self.attempts + 1).min(MAX_ATTEMPTS);
        if self.attempts >= MAX_ATTEMPTS {
            self.until = (now + Duration::minutes(LOCK_MINUTES)).timestamp_millis();
            FailureOutcome::LockedOut
        } else {
            FailureOutcome::AttemptsLeft(MAX_ATTEMPTS - self.attempts)
        }
    }

    /// Reset to the cleared state after a successful credential check.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
