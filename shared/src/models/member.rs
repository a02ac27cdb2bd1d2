//! Member model

use serde::{Deserialize, Serialize};

/// Lifecycle status of a member account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Provisioned but not yet activated
    Inactive,
    /// Activated with a bound phone number
    Active,
    /// Locked by the security ledger
    Locked,
    /// Suspended by an administrator
    Suspended,
}

/// Gender as captured on the provisioning roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Parse a roster cell value, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Member record owned by the identity store
///
/// `identifier` is the institution-issued employee/student code, unique
/// within the platform and compared case-insensitively. At most one phone
/// number is bound per member, and only at activation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub department_grade: Option<String>,
    pub designation_section: Option<String>,
    pub phone: Option<String>,
    pub status: MemberStatus,
    pub institution_id: String,
}

impl Member {
    /// Case-insensitive identifier comparison
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.identifier.eq_ignore_ascii_case(identifier)
    }
}

/// Provisioning payload: the seven roster columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub identifier: String,
    pub department_grade: Option<String>,
    pub designation_section: Option<String>,
}
