//! Shared types for the Sanare platform
//!
//! Common types used across the workspace: domain models, the unified
//! error system, API response structures, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Entity, EntityType, Gender, Member, MemberDraft, MemberStatus, Partnership};
