//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the code range:
/// - 0xxx: General errors
/// - 1xxx: Account errors
/// - 2xxx: Verification errors
/// - 3xxx: Institution errors
/// - 4xxx: Provisioning errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Account errors (1xxx)
    Account,
    /// Verification errors (2xxx)
    Verification,
    /// Institution errors (3xxx)
    Institution,
    /// Provisioning errors (4xxx)
    Provisioning,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Account,
            2000..3000 => Self::Verification,
            3000..4000 => Self::Institution,
            4000..5000 => Self::Provisioning,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Account => "account",
            Self::Verification => "verification",
            Self::Institution => "institution",
            Self::Provisioning => "provisioning",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Account);
        assert_eq!(ErrorCategory::from_code(2004), ErrorCategory::Verification);
        assert_eq!(ErrorCategory::from_code(3002), ErrorCategory::Institution);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Provisioning);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::NotFound.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::AccountLocked.category(), ErrorCategory::Account);
        assert_eq!(ErrorCode::OtpExpired.category(), ErrorCategory::Verification);
        assert_eq!(
            ErrorCode::InstitutionNotPartnered.category(),
            ErrorCategory::Institution
        );
        assert_eq!(
            ErrorCode::DuplicateEmail.category(),
            ErrorCategory::Provisioning
        );
        assert_eq!(
            ErrorCode::AnalyzerUnavailable.category(),
            ErrorCategory::System
        );
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Verification).unwrap();
        assert_eq!(json, "\"verification\"");
        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
    }
}
