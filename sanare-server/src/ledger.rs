//! Security ledger: per-identifier failure counters and lockouts
//!
//! Rate-limits sensitive account operations. Keys are uppercased
//! identifiers; entries live for the process lifetime (the ledger is a
//! rate-limit cache, not authoritative state, so no cleanup sweep runs).

use shared::util::now_millis;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Failed OTP verifications before a lockout is set
pub const OTP_MAX_ATTEMPTS: u32 = 3;
/// Failed logins before a lockout is set
pub const LOGIN_MAX_ATTEMPTS: u32 = 5;
/// OTP lockout duration
pub const OTP_LOCKOUT_MS: i64 = 15 * 60_000;
/// Login lockout duration. Product semantics require an administrator to
/// clear this one; mechanically it still expires on its own.
pub const LOGIN_LOCKOUT_MS: i64 = 24 * 60 * 60_000;

#[derive(Default)]
struct Entry {
    otp_failures: u32,
    login_failures: u32,
    /// Lockout expiry timestamp (ms); absent or past = not locked
    locked_until: Option<i64>,
}

/// Outcome of recording a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Attempts remaining before lockout
    AttemptsLeft(u32),
    /// Threshold reached; identifier locked for `minutes`
    LockedOut { minutes: u32 },
}

/// In-memory security ledger, shared across request handlers
#[derive(Clone, Default)]
pub struct SecurityLedger {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

fn key(identifier: &str) -> String {
    identifier.trim().to_uppercase()
}

fn remaining_minutes(locked_until: i64, now: i64) -> u32 {
    // Ceiling of remaining milliseconds / 60000
    let remaining = locked_until - now;
    ((remaining + 59_999) / 60_000).max(1) as u32
}

impl SecurityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining lockout minutes for this identifier, if a lockout is in
    /// effect. Expired lockouts are treated as absent.
    pub async fn check_lockout(&self, identifier: &str) -> Option<u32> {
        let map = self.inner.lock().await;
        let entry = map.get(&key(identifier))?;
        let locked_until = entry.locked_until?;
        let now = now_millis();
        if now < locked_until {
            Some(remaining_minutes(locked_until, now))
        } else {
            None
        }
    }

    /// Record a failed OTP verification. On the third consecutive failure
    /// the identifier is locked for 15 minutes and the counter resets.
    pub async fn record_otp_failure(&self, identifier: &str) -> FailureOutcome {
        let mut map = self.inner.lock().await;
        let entry = map.entry(key(identifier)).or_default();
        entry.otp_failures += 1;

        if entry.otp_failures >= OTP_MAX_ATTEMPTS {
            entry.locked_until = Some(now_millis() + OTP_LOCKOUT_MS);
            entry.otp_failures = 0;
            FailureOutcome::LockedOut {
                minutes: (OTP_LOCKOUT_MS / 60_000) as u32,
            }
        } else {
            FailureOutcome::AttemptsLeft(OTP_MAX_ATTEMPTS - entry.otp_failures)
        }
    }

    /// Record a failed login. On the fifth consecutive failure the
    /// identifier is locked for 24 hours and the counter resets.
    pub async fn record_login_failure(&self, identifier: &str) -> FailureOutcome {
        let mut map = self.inner.lock().await;
        let entry = map.entry(key(identifier)).or_default();
        entry.login_failures += 1;

        if entry.login_failures >= LOGIN_MAX_ATTEMPTS {
            entry.locked_until = Some(now_millis() + LOGIN_LOCKOUT_MS);
            entry.login_failures = 0;
            FailureOutcome::LockedOut {
                minutes: (LOGIN_LOCKOUT_MS / 60_000) as u32,
            }
        } else {
            FailureOutcome::AttemptsLeft(LOGIN_MAX_ATTEMPTS - entry.login_failures)
        }
    }

    /// Zero the OTP failure counter (successful verification)
    pub async fn reset_otp(&self, identifier: &str) {
        let mut map = self.inner.lock().await;
        if let Some(entry) = map.get_mut(&key(identifier)) {
            entry.otp_failures = 0;
        }
    }

    /// Zero the login failure counter (successful login)
    pub async fn reset_login(&self, identifier: &str) {
        let mut map = self.inner.lock().await;
        if let Some(entry) = map.get_mut(&key(identifier)) {
            entry.login_failures = 0;
        }
    }

    /// Administrator unlock: clear any lockout and both counters
    pub async fn clear_lockout(&self, identifier: &str) -> bool {
        let mut map = self.inner.lock().await;
        match map.get_mut(&key(identifier)) {
            Some(entry) => {
                let was_locked = entry
                    .locked_until
                    .is_some_and(|until| now_millis() < until);
                entry.locked_until = None;
                entry.otp_failures = 0;
                entry.login_failures = 0;
                was_locked
            }
            None => false,
        }
    }

    /// Current failure counters (otp, login) for diagnostics and tests
    pub async fn counters(&self, identifier: &str) -> (u32, u32) {
        let map = self.inner.lock().await;
        map.get(&key(identifier))
            .map(|e| (e.otp_failures, e.login_failures))
            .unwrap_or((0, 0))
    }
}
