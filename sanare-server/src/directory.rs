//! Member directory: the canonical in-memory identity store
//!
//! Owns the member records for the process lifetime. Constructed per
//! `AppState` and injected where needed, so tests build isolated
//! instances; a production deployment would back this with a database
//! keyed the same way.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Member, MemberDraft, MemberStatus};
use shared::util::member_row_id;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory member store with case-insensitive identifier lookup
#[derive(Clone, Default)]
pub struct MemberDirectory {
    inner: Arc<RwLock<Vec<Member>>>,
}

// ==================== Field validation ====================

/// `^[A-Za-z\s]{1,50}$`
fn is_valid_name(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 50
        && value.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}

/// `^[A-Za-z0-9_-]{1,20}$`, case-insensitive by construction
fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 20
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$`
fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Validate a provisioning draft against the roster field rules.
///
/// First failure wins; the error names the offending field.
pub fn validate_draft(draft: &MemberDraft) -> AppResult<()> {
    if !is_valid_name(&draft.first_name) {
        return Err(AppError::validation_field(
            "first_name",
            "First Name: Letters and spaces only (Max 50).",
        ));
    }
    if !is_valid_name(&draft.last_name) {
        return Err(AppError::validation_field(
            "last_name",
            "Last Name: Letters and spaces only (Max 50).",
        ));
    }
    if !is_valid_email(&draft.email) {
        return Err(AppError::validation_field("email", "Invalid email format."));
    }
    if !is_valid_identifier(&draft.identifier) {
        return Err(AppError::validation_field(
            "identifier",
            "ID: Max 20 chars, Alphanumeric/Hyphen/Underscore.",
        ));
    }
    Ok(())
}

impl MemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a directory pre-populated with members (seed data)
    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(members)),
        }
    }

    /// Case-insensitive lookup by institution-issued identifier
    pub async fn find_by_identifier(&self, identifier: &str) -> Option<Member> {
        let trimmed = identifier.trim();
        let members = self.inner.read().await;
        members
            .iter()
            .find(|m| m.matches_identifier(trimmed))
            .cloned()
    }

    /// Exact-match lookup by bound phone number
    pub async fn find_by_phone(&self, phone: &str) -> Option<Member> {
        let members = self.inner.read().await;
        members
            .iter()
            .find(|m| m.phone.as_deref() == Some(phone))
            .cloned()
    }

    /// Transition a member to `active` and bind the phone number.
    ///
    /// Activation is the only point where a phone is bound. A missing
    /// record here means a caller skipped the status check: internal
    /// consistency fault, not a user-facing outcome.
    pub async fn activate(&self, identifier: &str, phone: &str) -> AppResult<Member> {
        let trimmed = identifier.trim();
        let mut members = self.inner.write().await;
        let member = members
            .iter_mut()
            .find(|m| m.matches_identifier(trimmed))
            .ok_or_else(|| {
                AppError::internal(format!("activation target vanished: {trimmed}"))
            })?;
        member.status = MemberStatus::Active;
        member.phone = Some(phone.to_string());
        Ok(member.clone())
    }

    /// Bulk-provision members from validated drafts.
    ///
    /// Each draft is validated per the roster field rules, then checked
    /// for identifier/email uniqueness against the directory and the rest
    /// of the batch. Inserted members start `inactive` with no phone.
    /// Fails atomically: the first bad row rejects the whole batch.
    pub async fn provision(
        &self,
        drafts: Vec<MemberDraft>,
        institution_id: &str,
    ) -> AppResult<usize> {
        let mut members = self.inner.write().await;
        let mut pending: Vec<Member> = Vec::with_capacity(drafts.len());

        for (row, draft) in drafts.into_iter().enumerate() {
            validate_draft(&draft).map_err(|e| e.with_detail("row", row + 1))?;

            let duplicate_id = members
                .iter()
                .chain(pending.iter())
                .any(|m| m.matches_identifier(&draft.identifier));
            if duplicate_id {
                return Err(AppError::with_message(
                    ErrorCode::DuplicateIdentifier,
                    format!("Identifier {} already provisioned", draft.identifier),
                )
                .with_detail("row", row + 1));
            }

            let email_lower = draft.email.to_lowercase();
            let duplicate_email = members
                .iter()
                .chain(pending.iter())
                .any(|m| m.email.to_lowercase() == email_lower);
            if duplicate_email {
                return Err(AppError::with_message(
                    ErrorCode::DuplicateEmail,
                    format!("Email {} already provisioned", draft.email),
                )
                .with_detail("row", row + 1));
            }

            pending.push(Member {
                id: member_row_id(),
                identifier: draft.identifier,
                first_name: draft.first_name,
                last_name: draft.last_name,
                email: draft.email,
                gender: draft.gender,
                department_grade: draft.department_grade,
                designation_section: draft.designation_section,
                phone: None,
                status: MemberStatus::Inactive,
                institution_id: institution_id.to_string(),
            });
        }

        let inserted = pending.len();
        members.extend(pending);
        Ok(inserted)
    }

    /// Number of member records (diagnostics and tests)
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Gender;

    fn draft(identifier: &str, email: &str) -> MemberDraft {
        MemberDraft {
            first_name: "Aarav".into(),
            last_name: "Sharma".into(),
            email: email.into(),
            gender: Gender::Male,
            identifier: identifier.into(),
            department_grade: Some("Grade 10".into()),
            designation_section: Some("Section A".into()),
        }
    }

    #[test]
    fn test_name_rules() {
        assert!(is_valid_name("Aarav"));
        assert!(is_valid_name("Mary Jane"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("O'Brien"));
        assert!(!is_valid_name(&"a".repeat(51)));
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_valid_identifier("TC-2024-001"));
        assert!(is_valid_identifier("sch2024_10a"));
        assert!(!is_valid_identifier("has space"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier(&"x".repeat(21)));
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("aarav.sharma@school.edu"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@signs.com"));
        assert!(!is_valid_email("no@tld"));
        assert!(!is_valid_email("spaces in@mail.com"));
    }

    #[test]
    fn test_validate_draft_first_failure_wins() {
        let mut d = draft("TC-2024-001", "bad-email");
        d.first_name = "123".into();
        let err = validate_draft(&d).unwrap_err();
        // First name reported even though the email is also bad
        assert_eq!(
            err.details.unwrap().get("field").unwrap(),
            &serde_json::json!("first_name")
        );
    }

    #[tokio::test]
    async fn test_provision_and_lookup_case_insensitive() {
        let directory = MemberDirectory::new();
        directory
            .provision(vec![draft("SCH2024-10A-001", "aarav@school.edu")], "ENT-001")
            .await
            .unwrap();

        let found = directory.find_by_identifier("sch2024-10a-001").await.unwrap();
        assert_eq!(found.identifier, "SCH2024-10A-001");
        assert_eq!(found.status, MemberStatus::Inactive);
        assert!(found.phone.is_none());
    }

    #[tokio::test]
    async fn test_provision_rejects_duplicates() {
        let directory = MemberDirectory::new();
        directory
            .provision(vec![draft("ID-A", "a@x.com")], "ENT-001")
            .await
            .unwrap();

        let err = directory
            .provision(vec![draft("id-a", "b@x.com")], "ENT-001")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateIdentifier);

        let err = directory
            .provision(vec![draft("ID-B", "A@X.COM")], "ENT-001")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateEmail);

        // Batch failure is atomic
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_activate_binds_phone() {
        let directory = MemberDirectory::new();
        directory
            .provision(vec![draft("ID-C", "c@x.com")], "ENT-001")
            .await
            .unwrap();

        let member = directory.activate("id-c", "9876543210").await.unwrap();
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.phone.as_deref(), Some("9876543210"));

        let by_phone = directory.find_by_phone("9876543210").await.unwrap();
        assert_eq!(by_phone.identifier, "ID-C");
    }

    #[tokio::test]
    async fn test_activate_missing_is_internal_fault() {
        let directory = MemberDirectory::new();
        let err = directory.activate("GHOST", "9876543210").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
    }
}
