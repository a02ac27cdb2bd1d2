//! ID-card analysis collaborator
//!
//! The real platform sends a JPEG of a member ID card plus the partner
//! name list to an image-understanding service and gets back extracted
//! fields. This module defines that seam and ships a deterministic mock.
//! Analyzer failure is an infrastructure fault, not a business outcome:
//! it is caught at the API boundary and surfaced as a structured
//! "service unavailable" result, never an unhandled fault.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fields extracted from an ID-card image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdExtraction {
    pub institution_name: String,
    pub holder_name: Option<String>,
    /// `YYYY-MM-DD`
    pub expiry_date: Option<String>,
    pub is_valid_member_id: bool,
}

/// Faults from the analysis collaborator
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("ID analysis service unavailable")]
    Unavailable,
    #[error("analysis response malformed: {0}")]
    Malformed(String),
}

/// Image-understanding service seam
#[async_trait]
pub trait IdAnalyzer: Send + Sync {
    /// Analyze a JPEG-encoded ID card, matching against candidate
    /// partner names.
    async fn analyze(
        &self,
        jpeg: &[u8],
        candidates: &[String],
    ) -> Result<IdExtraction, AnalyzerError>;
}

/// Deterministic stand-in for the image-understanding service.
///
/// Returns a canned extraction; `failing()` builds one that reports the
/// service as down, for exercising the infrastructure-failure path.
pub struct MockIdAnalyzer {
    response: IdExtraction,
    fail: bool,
}

impl MockIdAnalyzer {
    pub fn new(response: IdExtraction) -> Self {
        Self {
            response,
            fail: false,
        }
    }

    /// A mock whose every call fails with `Unavailable`
    pub fn failing() -> Self {
        Self {
            response: IdExtraction {
                institution_name: String::new(),
                holder_name: None,
                expiry_date: None,
                is_valid_member_id: false,
            },
            fail: true,
        }
    }

    /// Demo default: recognizes a partnered school ID
    pub fn demo() -> Self {
        Self::new(IdExtraction {
            institution_name: "Delhi Public School, R.K. Puram".into(),
            holder_name: Some("Aarav Sharma".into()),
            expiry_date: Some("2026-03-31".into()),
            is_valid_member_id: true,
        })
    }
}

#[async_trait]
impl IdAnalyzer for MockIdAnalyzer {
    async fn analyze(
        &self,
        jpeg: &[u8],
        _candidates: &[String],
    ) -> Result<IdExtraction, AnalyzerError> {
        if self.fail {
            return Err(AnalyzerError::Unavailable);
        }
        if jpeg.is_empty() {
            return Err(AnalyzerError::Malformed("empty image".into()));
        }
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_canned_extraction() {
        let analyzer = MockIdAnalyzer::demo();
        let extraction = analyzer.analyze(b"\xff\xd8\xff", &[]).await.unwrap();
        assert!(extraction.is_valid_member_id);
        assert_eq!(extraction.institution_name, "Delhi Public School, R.K. Puram");
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let analyzer = MockIdAnalyzer::failing();
        let err = analyzer.analyze(b"\xff\xd8\xff", &[]).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Unavailable));
    }

    #[tokio::test]
    async fn test_empty_image_is_malformed() {
        let analyzer = MockIdAnalyzer::demo();
        let err = analyzer.analyze(b"", &[]).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Malformed(_)));
    }
}
