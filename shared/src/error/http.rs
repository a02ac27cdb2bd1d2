//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::AccountNotFound | Self::InstitutionNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::AlreadyExists
            | Self::PhoneAlreadyBound
            | Self::DuplicateIdentifier
            | Self::DuplicateEmail => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::InvalidCredentials | Self::OtpMismatch | Self::OtpNotIssued => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::AccountSuspended => StatusCode::FORBIDDEN,

            // 410 Gone
            Self::OtpExpired => StatusCode::GONE,

            // 429 Too Many Requests
            Self::AccountLocked | Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,

            // 503 Service Unavailable (infrastructure faults, client can retry)
            Self::AnalyzerUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
