//! End-to-end flows against a fully seeded state

use sanare_server::analyzer::MockIdAnalyzer;
use sanare_server::engine::{PassPayload, PassVerification, encode_pass};
use sanare_server::otp::DEMO_CODE;
use sanare_server::service::{AccountStatus, ActivationOutcome, LoginOutcome, OtpRequest};
use sanare_server::{AppState, Config};
use shared::models::MemberStatus;
use std::sync::Arc;

fn seeded_state() -> AppState {
    AppState::new(&Config::default())
}

#[tokio::test]
async fn test_status_check_is_idempotent() {
    let state = seeded_state();

    for _ in 0..5 {
        match state.service.account_status("tc-2024-001").await {
            AccountStatus::Found {
                member,
                requires_activation,
            } => {
                assert_eq!(member.identifier, "TC-2024-001");
                assert_eq!(member.first_name, "Arjun");
                assert!(requires_activation);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }
    assert_eq!(state.service.ledger().counters("TC-2024-001").await, (0, 0));
}

#[tokio::test]
async fn test_activation_then_login_end_to_end() {
    let state = seeded_state();
    let id = "SCH2024-10A-001";
    let phone = "9876543210";

    match state.service.request_otp(id, phone).await.unwrap() {
        OtpRequest::Sent { expires_in, .. } => assert_eq!(expires_in, 300),
        other => panic!("expected Sent, got {other:?}"),
    }

    match state.service.verify_otp(id, phone, DEMO_CODE).await.unwrap() {
        ActivationOutcome::Activated { member } => {
            assert_eq!(member.status, MemberStatus::Active);
            assert_eq!(member.phone.as_deref(), Some(phone));
            assert_eq!(member.first_name, "Aarav");
        }
        other => panic!("expected Activated, got {other:?}"),
    }

    match state.service.login(id, phone).await {
        LoginOutcome::Success { member } => assert_eq!(member.identifier, id),
        other => panic!("expected Success, got {other:?}"),
    }

    // Wrong phone still fails after activation
    assert!(matches!(
        state.service.login(id, "9000000001").await,
        LoginOutcome::Mismatch { attempts_left: 4 }
    ));
}

#[tokio::test]
async fn test_otp_lockout_blocks_status_check() {
    let state = seeded_state();
    let id = "TC-2024-006";

    state.service.request_otp(id, "9812345670").await.unwrap();
    for _ in 0..3 {
        state
            .service
            .verify_otp(id, "9812345670", "999999")
            .await
            .unwrap();
    }

    match state.service.account_status(id).await {
        AccountStatus::Locked { minutes } => assert!((14..=15).contains(&minutes)),
        other => panic!("expected Locked, got {other:?}"),
    }
    assert_eq!(state.service.ledger().counters(id).await.0, 0);
}

#[tokio::test]
async fn test_phone_conflict_does_not_mutate() {
    let state = seeded_state();

    state
        .service
        .request_otp("TC-2024-001", "9876500001")
        .await
        .unwrap();
    state
        .service
        .verify_otp("TC-2024-001", "9876500001", DEMO_CODE)
        .await
        .unwrap();

    let outcome = state
        .service
        .request_otp("TC-2024-002", "9876500001")
        .await
        .unwrap();
    assert!(matches!(outcome, OtpRequest::PhoneConflict));

    // Holder unchanged, requester still inactive with no phone
    let holder = state
        .service
        .directory()
        .find_by_phone("9876500001")
        .await
        .unwrap();
    assert_eq!(holder.identifier, "TC-2024-001");
    let requester = state
        .service
        .directory()
        .find_by_identifier("TC-2024-002")
        .await
        .unwrap();
    assert_eq!(requester.status, MemberStatus::Inactive);
    assert!(requester.phone.is_none());
}

#[tokio::test]
async fn test_entity_pass_grants_partnership_discount() {
    let state = seeded_state();

    let payload = encode_pass(&PassPayload {
        entity_id: "ENT-001".into(),
        member_id: Some("STU-123".into()),
    });
    match state.engine.verify_entity_payload(&payload) {
        PassVerification::Granted { entity, quote } => {
            assert_eq!(entity.name, "Delhi Public School, R.K. Puram");
            assert_eq!(quote.original_price, 4500);
            assert_eq!(quote.discount_amount, 1125);
            assert_eq!(quote.final_price, 3375);
        }
        other => panic!("expected Granted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_analyzer_outage_is_a_structured_result() {
    let state = AppState::with_analyzer(&Config::default(), Arc::new(MockIdAnalyzer::failing()));

    let candidates = state.engine.partner_names();
    let err = state
        .analyzer
        .analyze(b"\xff\xd8\xff", &candidates)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "ID analysis service unavailable");
}

#[tokio::test]
async fn test_login_lockout_then_admin_unlock() {
    let state = seeded_state();
    let id = "TC-2024-007";

    for expected_left in [4, 3, 2, 1] {
        match state.service.login(id, "9999999999").await {
            LoginOutcome::Mismatch { attempts_left } => assert_eq!(attempts_left, expected_left),
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }
    assert!(matches!(
        state.service.login(id, "9999999999").await,
        LoginOutcome::LockedOut { .. }
    ));

    assert!(state.service.unlock(id).await);
    assert!(matches!(
        state.service.account_status(id).await,
        AccountStatus::Found { .. }
    ));
}
