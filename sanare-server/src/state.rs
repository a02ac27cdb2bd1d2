//! Application state

use crate::analyzer::{IdAnalyzer, MockIdAnalyzer};
use crate::config::{Config, OtpMode};
use crate::directory::MemberDirectory;
use crate::engine::VerificationEngine;
use crate::ledger::SecurityLedger;
use crate::otp::{CodeIssuer, FixedCodeIssuer, RandomCodeIssuer};
use crate::seed;
use crate::service::ActivationService;
use std::sync::Arc;

/// Shared state for all request handlers
pub struct AppState {
    pub service: ActivationService,
    pub engine: VerificationEngine,
    pub analyzer: Arc<dyn IdAnalyzer>,
}

impl AppState {
    /// Build state seeded with the demo dataset
    pub fn new(config: &Config) -> Self {
        let issuer: Arc<dyn CodeIssuer> = match config.otp_mode {
            OtpMode::Fixed => Arc::new(FixedCodeIssuer::new()),
            OtpMode::Random => Arc::new(RandomCodeIssuer::new()),
        };

        Self {
            service: ActivationService::new(
                MemberDirectory::with_members(seed::members()),
                SecurityLedger::new(),
                issuer,
            ),
            engine: VerificationEngine::new(
                seed::entities(),
                seed::partnerships(),
                config.base_price,
            ),
            analyzer: Arc::new(MockIdAnalyzer::demo()),
        }
    }

    /// State with an injected analyzer (tests exercise the failure path)
    pub fn with_analyzer(config: &Config, analyzer: Arc<dyn IdAnalyzer>) -> Self {
        Self {
            analyzer,
            ..Self::new(config)
        }
    }
}
