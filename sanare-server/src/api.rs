//! HTTP surface of the verification/activation service
//!
//! Thin handlers over [`ActivationService`] and [`VerificationEngine`].
//! Business outcomes (mismatches, lockouts, unknown passes) are reported
//! in the response body with `success: false`; `AppError` is reserved
//! for requests that bypass the normal flow and for internal faults.

use crate::analyzer::AnalyzerError;
use crate::engine::{NameVerification, PassVerification, PricingQuote};
use crate::service::{AccountStatus, ActivationOutcome, LoginOutcome, OtpRequest};
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use shared::models::{Entity, Member, MemberStatus};
use std::sync::Arc;

// ==================== Wire types ====================

#[derive(Deserialize)]
pub struct IdentifierRequest {
    pub identifier: String,
}

#[derive(Deserialize)]
pub struct OtpRequestBody {
    pub identifier: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct OtpVerifyBody {
    pub identifier: String,
    pub phone: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub identifier: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct PassBody {
    pub payload: String,
}

#[derive(Deserialize)]
pub struct IdCardBody {
    /// Base64-encoded JPEG
    pub image: String,
}

#[derive(Deserialize)]
pub struct RosterBody {
    pub institution_id: String,
    pub csv: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_activation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

#[derive(Serialize)]
pub struct OtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// Shared shape of activation, login, and verification results
#[derive(Serialize)]
pub struct OutcomeResponse {
    pub success: bool,
    pub has_partnership: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}

impl OutcomeResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            has_partnership: false,
            message: message.into(),
            member: None,
            pricing: None,
            entity: None,
        }
    }
}

// ==================== Account flow ====================

async fn account_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdentifierRequest>,
) -> AppResult<Json<StatusResponse>> {
    match state.service.account_status(&req.identifier).await {
        AccountStatus::Locked { minutes } => Err(AppError::locked(minutes)),
        AccountStatus::NotFound => Ok(Json(StatusResponse {
            exists: false,
            status: None,
            requires_activation: None,
            first_name: None,
        })),
        AccountStatus::Found {
            member,
            requires_activation,
        } => Ok(Json(StatusResponse {
            exists: true,
            status: Some(member.status),
            requires_activation: Some(requires_activation),
            first_name: Some(member.first_name),
        })),
    }
}

async fn request_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OtpRequestBody>,
) -> AppResult<Json<OtpResponse>> {
    let response = match state.service.request_otp(&req.identifier, &req.phone).await? {
        OtpRequest::InvalidPhone => OtpResponse {
            success: false,
            message: "Enter a valid 10-digit mobile number.".into(),
            expires_in: None,
        },
        OtpRequest::PhoneConflict => OtpResponse {
            success: false,
            message: "This phone number is already registered with another ID.".into(),
            expires_in: None,
        },
        OtpRequest::Sent { phone, expires_in } => OtpResponse {
            success: true,
            message: format!("OTP sent to {phone}"),
            expires_in: Some(expires_in),
        },
    };
    Ok(Json(response))
}

async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OtpVerifyBody>,
) -> AppResult<Json<OutcomeResponse>> {
    let outcome = state
        .service
        .verify_otp(&req.identifier, &req.phone, &req.code)
        .await?;

    let response = match outcome {
        ActivationOutcome::Locked { minutes } => OutcomeResponse::failure(format!(
            "Account locked. Please try again in {minutes} minutes."
        )),
        ActivationOutcome::Expired => {
            OutcomeResponse::failure("OTP expired. Please request a new code.")
        }
        ActivationOutcome::NotIssued => {
            OutcomeResponse::failure("No OTP was requested for this ID.")
        }
        ActivationOutcome::PhoneConflict => {
            OutcomeResponse::failure("This phone number is already registered with another ID.")
        }
        ActivationOutcome::Mismatch { attempts_left } => {
            OutcomeResponse::failure(format!("Incorrect OTP. {attempts_left} attempts left."))
        }
        ActivationOutcome::LockedOut { .. } => {
            OutcomeResponse::failure("3 failed attempts. Account locked for 15 minutes.")
        }
        ActivationOutcome::Activated { member } => member_success(&state, member, "Account activated!"),
    };
    Ok(Json(response))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginBody>,
) -> Json<OutcomeResponse> {
    let response = match state.service.login(&req.identifier, &req.phone).await {
        LoginOutcome::Locked { minutes } => OutcomeResponse::failure(format!(
            "Account locked. Please try again in {minutes} minutes."
        )),
        LoginOutcome::Mismatch { attempts_left } => OutcomeResponse::failure(format!(
            "Invalid credentials. {attempts_left} attempts left."
        )),
        LoginOutcome::LockedOut { .. } => {
            OutcomeResponse::failure("5 failed attempts. Account locked. Contact Admin.")
        }
        LoginOutcome::Success { member } => member_success(&state, member, "Login successful"),
    };
    Json(response)
}

/// Successful member flows report whether the member's institution has a
/// partnership; the pricing quote rides along when it does.
fn member_success(state: &AppState, member: Member, message: &str) -> OutcomeResponse {
    let quote = state
        .engine
        .institution_partnership(&member.institution_id)
        .map(|p| {
            state
                .engine
                .quote(p.discount_percentage, p.contract_end_date.clone())
        });
    OutcomeResponse {
        success: true,
        has_partnership: quote.is_some(),
        message: message.into(),
        member: Some(member),
        pricing: quote,
        entity: None,
    }
}

// ==================== Verification ====================

async fn verify_pass(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PassBody>,
) -> Json<OutcomeResponse> {
    let response = match state.engine.verify_entity_payload(&req.payload) {
        PassVerification::InvalidPayload => OutcomeResponse::failure("Invalid pass format."),
        PassVerification::UnknownEntity => {
            OutcomeResponse::failure("Institution not found in partnership records.")
        }
        PassVerification::Granted { entity, quote } => OutcomeResponse {
            success: true,
            has_partnership: true,
            message: format!("Partnership verified: {}", entity.name),
            member: None,
            pricing: Some(quote),
            entity: Some(entity),
        },
    };
    Json(response)
}

async fn verify_id_card(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdCardBody>,
) -> AppResult<Json<OutcomeResponse>> {
    let jpeg = BASE64
        .decode(req.image.trim())
        .map_err(|_| AppError::invalid_request("image must be base64-encoded JPEG"))?;

    let candidates = state.engine.partner_names();
    let extraction = match state.analyzer.analyze(&jpeg, &candidates).await {
        Ok(extraction) => extraction,
        Err(e) => {
            tracing::error!(error = %e, "ID analysis failed");
            return Ok(Json(OutcomeResponse::failure(
                "ID analysis service unavailable. Please try scanning your pass instead.",
            )));
        }
    };

    // All three engine outcomes are successes carrying a price; only the
    // analyzer outage above reports success: false.
    let response = match state.engine.verify_extracted(&extraction) {
        NameVerification::NotMemberId { quote } => OutcomeResponse {
            success: true,
            has_partnership: false,
            message: "Could not verify a member ID. Standard pricing applies.".into(),
            member: None,
            pricing: Some(quote),
            entity: None,
        },
        NameVerification::Partnered {
            institution_name,
            quote,
        } => OutcomeResponse {
            success: true,
            has_partnership: true,
            message: format!("Partnership verified: {institution_name}"),
            member: None,
            pricing: Some(quote),
            entity: None,
        },
        NameVerification::NotPartnered {
            institution_name,
            quote,
        } => OutcomeResponse {
            success: true,
            has_partnership: false,
            message: format!(
                "{institution_name} is not a partner institution. Standard pricing applies."
            ),
            member: None,
            pricing: Some(quote),
            entity: None,
        },
    };
    Ok(Json(response))
}

// ==================== Admin ====================

#[derive(Serialize)]
pub struct RosterResponse {
    pub success: bool,
    pub message: String,
    pub provisioned: usize,
}

async fn provision_roster(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RosterBody>,
) -> AppResult<Json<RosterResponse>> {
    let drafts = crate::roster::parse_roster(&req.csv)?;
    if drafts.is_empty() {
        return Err(AppError::invalid_request("roster contains no data rows"));
    }
    let provisioned = state
        .service
        .directory()
        .provision(drafts, &req.institution_id)
        .await?;
    tracing::info!(provisioned, institution = %req.institution_id, "roster provisioned");
    Ok(Json(RosterResponse {
        success: true,
        message: format!("Provisioned {provisioned} members"),
        provisioned,
    }))
}

#[derive(Serialize)]
pub struct UnlockResponse {
    pub success: bool,
    pub message: String,
}

async fn unlock_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdentifierRequest>,
) -> Json<UnlockResponse> {
    let was_locked = state.service.unlock(&req.identifier).await;
    let message = if was_locked {
        "Account unlocked"
    } else {
        "Account was not locked; counters cleared"
    };
    Json(UnlockResponse {
        success: true,
        message: message.into(),
    })
}

async fn health() -> shared::error::ApiResponse<serde_json::Value> {
    shared::error::ApiResponse::success(serde_json::json!({ "status": "ok" }))
}

pub fn router(state: Arc<AppState>) -> Router {
    use tower::limit::ConcurrencyLimitLayer;
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/api/account/status", post(account_status))
        .route("/api/account/otp/request", post(request_otp))
        .route("/api/account/otp/verify", post(verify_otp))
        .route("/api/account/login", post(login))
        .route("/api/verify/pass", post(verify_pass))
        .route("/api/verify/id-card", post(verify_id_card))
        .route("/api/admin/roster", post(provision_roster))
        .route("/api/admin/unlock", post(unlock_account))
        .route("/api/health", get(health))
        .layer(ConcurrencyLimitLayer::new(100))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
