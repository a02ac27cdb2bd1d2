//! Activation and login state machine
//!
//! Orchestrates the directory, security ledger, and code issuer. Every
//! operation returns a tagged outcome enum; callers match instead of
//! probing fields. Mutating operations for one identifier are serialized
//! through a per-key mutex so each identifier sees a linear history of
//! counter updates and state transitions.

use crate::directory::MemberDirectory;
use crate::ledger::{FailureOutcome, SecurityLedger};
use crate::otp::{CodeIssuer, CodeVerdict};
use dashmap::DashMap;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Member, MemberStatus};
use std::sync::Arc;
use tokio::sync::Mutex;

/// `^[6-9]\d{9}$`: Indian mobile numbers
pub fn is_valid_phone(value: &str) -> bool {
    value.len() == 10
        && value.bytes().all(|b| b.is_ascii_digit())
        && matches!(value.as_bytes()[0], b'6'..=b'9')
}

/// Result of an account status lookup. Never mutates any state.
#[derive(Debug, Clone)]
pub enum AccountStatus {
    /// A lockout is in effect; nothing else is revealed
    Locked { minutes: u32 },
    NotFound,
    Found {
        member: Member,
        /// `inactive` members must complete OTP activation before login
        requires_activation: bool,
    },
}

/// Result of requesting an activation code
#[derive(Debug, Clone)]
pub enum OtpRequest {
    InvalidPhone,
    /// The phone is already bound to a different identifier
    PhoneConflict,
    Sent { phone: String, expires_in: u64 },
}

/// Result of submitting an activation code
#[derive(Debug, Clone)]
pub enum ActivationOutcome {
    /// Pre-existing lockout; the attempt was not evaluated
    Locked { minutes: u32 },
    /// The issued code's expiry has passed
    Expired,
    /// No code was issued for this identifier
    NotIssued,
    /// The phone was bound to a different identifier since the code was
    /// requested; the code is spent and must be re-requested
    PhoneConflict,
    Mismatch { attempts_left: u32 },
    /// This failure crossed the threshold and set a lockout
    LockedOut { minutes: u32 },
    Activated { member: Member },
}

/// Result of a phone login
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Pre-existing lockout; the attempt was not evaluated
    Locked { minutes: u32 },
    Mismatch { attempts_left: u32 },
    /// This failure crossed the threshold and set a lockout
    LockedOut { minutes: u32 },
    Success { member: Member },
}

/// The activation/login orchestrator
#[derive(Clone)]
pub struct ActivationService {
    directory: MemberDirectory,
    ledger: SecurityLedger,
    issuer: Arc<dyn CodeIssuer>,
    /// Per-identifier operation locks (uppercased key)
    op_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl ActivationService {
    pub fn new(
        directory: MemberDirectory,
        ledger: SecurityLedger,
        issuer: Arc<dyn CodeIssuer>,
    ) -> Self {
        Self {
            directory,
            ledger,
            issuer,
            op_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn directory(&self) -> &MemberDirectory {
        &self.directory
    }

    pub fn ledger(&self) -> &SecurityLedger {
        &self.ledger
    }

    fn op_lock(&self, identifier: &str) -> Arc<Mutex<()>> {
        let key = identifier.trim().to_uppercase();
        self.op_locks.entry(key).or_default().clone()
    }

    /// Look up an account by identifier. Read-only: repeated calls leave
    /// counters and lockouts untouched.
    pub async fn account_status(&self, identifier: &str) -> AccountStatus {
        if let Some(minutes) = self.ledger.check_lockout(identifier).await {
            return AccountStatus::Locked { minutes };
        }
        match self.directory.find_by_identifier(identifier).await {
            Some(member) => {
                let requires_activation = member.status == MemberStatus::Inactive;
                AccountStatus::Found {
                    member,
                    requires_activation,
                }
            }
            None => AccountStatus::NotFound,
        }
    }

    /// Issue an activation code for an identifier/phone pair.
    ///
    /// Not gated on lockouts: issuing is harmless while verification is
    /// locked. The conflict check rejects a phone already bound to a
    /// different identifier before anything is issued, so a conflicting
    /// request mutates nothing.
    pub async fn request_otp(&self, identifier: &str, phone: &str) -> AppResult<OtpRequest> {
        let lock = self.op_lock(identifier);
        let _guard = lock.lock().await;

        if !is_valid_phone(phone) {
            return Ok(OtpRequest::InvalidPhone);
        }

        let member = self
            .directory
            .find_by_identifier(identifier)
            .await
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::AccountNotFound,
                    "ID not found. Contact your admin.",
                )
            })?;

        if let Some(holder) = self.directory.find_by_phone(phone).await {
            if !holder.matches_identifier(&member.identifier) {
                return Ok(OtpRequest::PhoneConflict);
            }
        }

        let expires_in = self.issuer.issue(&member.identifier, phone).await?;
        Ok(OtpRequest::Sent {
            phone: phone.to_string(),
            expires_in,
        })
    }

    /// Verify a submitted activation code.
    ///
    /// Gated on the lockout first. A match activates the member, binds
    /// the phone, and clears the OTP counter; a mismatch feeds the
    /// ledger, which may set the 15-minute lockout.
    pub async fn verify_otp(
        &self,
        identifier: &str,
        phone: &str,
        code: &str,
    ) -> AppResult<ActivationOutcome> {
        let lock = self.op_lock(identifier);
        let _guard = lock.lock().await;

        if let Some(minutes) = self.ledger.check_lockout(identifier).await {
            return Ok(ActivationOutcome::Locked { minutes });
        }

        match self.issuer.check(identifier, code).await {
            CodeVerdict::NotIssued => Ok(ActivationOutcome::NotIssued),
            CodeVerdict::Expired => Ok(ActivationOutcome::Expired),
            CodeVerdict::Mismatch => match self.ledger.record_otp_failure(identifier).await {
                FailureOutcome::AttemptsLeft(attempts_left) => {
                    Ok(ActivationOutcome::Mismatch { attempts_left })
                }
                FailureOutcome::LockedOut { minutes } => {
                    tracing::warn!(identifier, minutes, "OTP lockout set");
                    Ok(ActivationOutcome::LockedOut { minutes })
                }
            },
            CodeVerdict::Match => {
                // The conflict check at request time covers the phone the
                // code was requested for; the caller supplies the phone
                // again here, so it must be re-checked before binding.
                if let Some(holder) = self.directory.find_by_phone(phone).await {
                    if !holder.matches_identifier(identifier.trim()) {
                        return Ok(ActivationOutcome::PhoneConflict);
                    }
                }
                self.ledger.reset_otp(identifier).await;
                let member = self.directory.activate(identifier, phone).await?;
                tracing::info!(identifier = %member.identifier, "account activated");
                Ok(ActivationOutcome::Activated { member })
            }
        }
    }

    /// Authenticate an active member by identifier + bound phone.
    ///
    /// Any failure (unknown identifier, wrong phone, not yet activated)
    /// is a credential mismatch; the response does not say which.
    pub async fn login(&self, identifier: &str, phone: &str) -> LoginOutcome {
        let lock = self.op_lock(identifier);
        let _guard = lock.lock().await;

        if let Some(minutes) = self.ledger.check_lockout(identifier).await {
            return LoginOutcome::Locked { minutes };
        }

        if let Some(member) = self.directory.find_by_identifier(identifier).await {
            if member.status == MemberStatus::Active && member.phone.as_deref() == Some(phone) {
                self.ledger.reset_login(identifier).await;
                tracing::info!(identifier = %member.identifier, "login ok");
                return LoginOutcome::Success { member };
            }
        }

        match self.ledger.record_login_failure(identifier).await {
            FailureOutcome::AttemptsLeft(attempts_left) => {
                LoginOutcome::Mismatch { attempts_left }
            }
            FailureOutcome::LockedOut { minutes } => {
                tracing::warn!(identifier, minutes, "login lockout set");
                LoginOutcome::LockedOut { minutes }
            }
        }
    }

    /// Administrator unlock: clears any lockout and both counters
    pub async fn unlock(&self, identifier: &str) -> bool {
        let lock = self.op_lock(identifier);
        let _guard = lock.lock().await;
        self.ledger.clear_lockout(identifier).await
    }
}
