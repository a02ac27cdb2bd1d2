//! Sanare mock verification/activation backend
//!
//! In-memory stand-in for the institutional benefits platform: account
//! activation (identifier → OTP → phone binding), phone login with
//! lockout enforcement, and partnership verification from scanned passes
//! or analyzed ID cards.

pub mod analyzer;
pub mod api;
pub mod config;
pub mod directory;
pub mod engine;
pub mod ledger;
pub mod otp;
pub mod roster;
pub mod seed;
pub mod service;
pub mod state;

pub use config::Config;
pub use state::AppState;
