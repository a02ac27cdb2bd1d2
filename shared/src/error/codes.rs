//! Unified error codes for the Sanare platform
//!
//! Error codes are shared between the verification service and its
//! front-end collaborators, organized by category:
//! - 0xxx: General errors
//! - 1xxx: Account errors
//! - 2xxx: Verification errors
//! - 3xxx: Institution errors
//! - 4xxx: Provisioning errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes are represented as u16 values for efficient serialization and
/// cross-language compatibility with the web front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Account ====================
    /// Identifier is not known to the platform
    AccountNotFound = 1001,
    /// Identifier/phone pair did not match a member
    InvalidCredentials = 1002,
    /// Account is locked out after repeated failures
    AccountLocked = 1003,
    /// Account has not been activated yet
    AccountInactive = 1004,
    /// Account has been suspended by an administrator
    AccountSuspended = 1005,

    // ==================== 2xxx: Verification ====================
    /// One-time passcode did not match
    OtpMismatch = 2001,
    /// One-time passcode has expired
    OtpExpired = 2002,
    /// No passcode was issued for this identifier
    OtpNotIssued = 2003,
    /// Too many failed verification attempts
    TooManyAttempts = 2004,
    /// Phone number is malformed
    PhoneInvalid = 2005,
    /// Phone number is already bound to another identifier
    PhoneAlreadyBound = 2006,

    // ==================== 3xxx: Institution ====================
    /// Institution not found in partnership records
    InstitutionNotFound = 3001,
    /// Institution recognized but not a partner
    InstitutionNotPartnered = 3002,
    /// Membership pass payload could not be decoded
    PassPayloadInvalid = 3003,

    // ==================== 4xxx: Provisioning ====================
    /// Roster row has the wrong number of columns
    RosterColumnMismatch = 4001,
    /// Identifier already provisioned for this institution
    DuplicateIdentifier = 4002,
    /// Email already provisioned for this institution
    DuplicateEmail = 4003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// ID-analysis service unavailable
    AnalyzerUnavailable = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",

            Self::AccountNotFound => "Account not found",
            Self::InvalidCredentials => "Invalid credentials",
            Self::AccountLocked => "Account locked",
            Self::AccountInactive => "Account not activated",
            Self::AccountSuspended => "Account suspended",

            Self::OtpMismatch => "Incorrect OTP",
            Self::OtpExpired => "OTP expired",
            Self::OtpNotIssued => "No OTP issued",
            Self::TooManyAttempts => "Too many failed attempts",
            Self::PhoneInvalid => "Invalid mobile number",
            Self::PhoneAlreadyBound => "Phone number already registered",

            Self::InstitutionNotFound => "Institution not found",
            Self::InstitutionNotPartnered => "Institution not partnered",
            Self::PassPayloadInvalid => "Invalid pass payload",

            Self::RosterColumnMismatch => "Roster row has wrong column count",
            Self::DuplicateIdentifier => "Identifier already provisioned",
            Self::DuplicateEmail => "Email already provisioned",

            Self::InternalError => "Internal server error",
            Self::AnalyzerUnavailable => "ID analysis service unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when converting an unrecognized u16 to an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,

            1001 => Self::AccountNotFound,
            1002 => Self::InvalidCredentials,
            1003 => Self::AccountLocked,
            1004 => Self::AccountInactive,
            1005 => Self::AccountSuspended,

            2001 => Self::OtpMismatch,
            2002 => Self::OtpExpired,
            2003 => Self::OtpNotIssued,
            2004 => Self::TooManyAttempts,
            2005 => Self::PhoneInvalid,
            2006 => Self::PhoneAlreadyBound,

            3001 => Self::InstitutionNotFound,
            3002 => Self::InstitutionNotPartnered,
            3003 => Self::PassPayloadInvalid,

            4001 => Self::RosterColumnMismatch,
            4002 => Self::DuplicateIdentifier,
            4003 => Self::DuplicateEmail,

            9001 => Self::InternalError,
            9002 => Self::AnalyzerUnavailable,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::AccountLocked.code(), 1003);
        assert_eq!(ErrorCode::OtpMismatch.code(), 2001);
        assert_eq!(ErrorCode::PassPayloadInvalid.code(), 3003);
        assert_eq!(ErrorCode::AnalyzerUnavailable.code(), 9002);
    }

    #[test]
    fn test_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::AccountLocked,
            ErrorCode::OtpExpired,
            ErrorCode::PhoneAlreadyBound,
            ErrorCode::InstitutionNotPartnered,
            ErrorCode::RosterColumnMismatch,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(777), Err(InvalidErrorCode(777)));
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::AccountLocked).unwrap();
        assert_eq!(json, "1003");
        let code: ErrorCode = serde_json::from_str("2002").unwrap();
        assert_eq!(code, ErrorCode::OtpExpired);
    }
}
