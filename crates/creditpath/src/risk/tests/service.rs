use super::common::*;
use crate::risk::domain::FieldValue;
use crate::risk::gateway::GatewayError;
use crate::risk::orchestrator::SubmissionState;
use crate::risk::prediction::Decision;
use crate::risk::service::{RiskAssessmentService, RiskServiceError};
use crate::risk::sessions::{SessionError, SessionId};
use std::sync::Arc;

#[tokio::test]
async fn open_edit_submit_produces_dashboard() {
    let gateway = Arc::new(ScriptedGateway::with_outcomes([Ok(approve_result())]));
    let service = build_service(gateway.clone());

    let opened = service.open_session(None).expect("session opens");
    assert!(opened.submittable);
    assert!(opened.dashboard.is_none());

    let edited = service
        .update_field(&opened.session_id, "interestRate", &FieldValue::from("14.25"))
        .expect("edit applies");
    assert_eq!(edited.inputs.interest_rate, 14.25);

    let view = service.submit(&opened.session_id).await.expect("submits");
    assert!(!view.loading);
    assert!(view.error.is_none());

    let dashboard = view.dashboard.expect("dashboard populated");
    assert_eq!(dashboard.gauge.display, "25.0%");
    assert_eq!(dashboard.gauge.label, "Low Risk");
    assert_eq!(dashboard.gauge.color_hex, "#22c55e");
    assert_eq!(dashboard.recommendation.decision, Decision::Approve);
    assert_eq!(dashboard.recommendation.badge, "Low Risk");
    assert_eq!(
        dashboard.recommendation.guidance,
        "Borrower meets all criteria. Proceed with loan origination."
    );

    let bars = dashboard.model_comparison.expect("bars present");
    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].label, "Logistic Regression");
    assert_eq!(bars[0].display, "22.0%");
    assert!(bars[2].is_final);

    assert_eq!(gateway.requests()[0].interestrate, 14.25);
}

#[tokio::test]
async fn gateway_failure_is_reported_on_the_view() {
    let gateway = Arc::new(ScriptedGateway::with_outcomes([Err(
        GatewayError::Transport("connection refused".to_string()),
    )]));
    let service = build_service(gateway);
    let opened = service.open_session(None).expect("session opens");

    let view = service.submit(&opened.session_id).await.expect("submits");
    assert_eq!(
        view.error.as_deref(),
        Some("Prediction failed: connection refused")
    );
    assert!(matches!(view.state, SubmissionState::Failed { .. }));
    assert!(view.dashboard.is_none());
}

#[test]
fn unknown_field_and_bad_values_are_rejected() {
    let service = build_service(Arc::new(ScriptedGateway::default()));
    let opened = service.open_session(None).expect("session opens");

    let err = service
        .update_field(&opened.session_id, "ficoScore", &FieldValue::from(700.0))
        .expect_err("unknown field");
    assert!(matches!(err, RiskServiceError::UnknownField(field) if field == "ficoScore"));

    let err = service
        .update_field(&opened.session_id, "state", &FieldValue::from("ZZ"))
        .expect_err("unknown state");
    assert!(matches!(err, RiskServiceError::Field(_)));

    let view = service.session(&opened.session_id).expect("session exists");
    assert_eq!(view.inputs.state.as_str(), "CA");
}

#[test]
fn missing_session_is_not_found() {
    let service = build_service(Arc::new(ScriptedGateway::default()));
    let err = service
        .session(&SessionId("session-missing".to_string()))
        .expect_err("no such session");
    assert!(matches!(
        err,
        RiskServiceError::Session(SessionError::NotFound)
    ));
}

#[test]
fn closing_a_session_removes_it() {
    let service = build_service(Arc::new(ScriptedGateway::default()));
    let opened = service.open_session(None).expect("session opens");
    service
        .close_session(&opened.session_id)
        .expect("session closes");
    assert!(service.session(&opened.session_id).is_err());
}

#[test]
fn unavailable_store_propagates() {
    let service = RiskAssessmentService::new(
        Arc::new(UnavailableSessionStore),
        Arc::new(ScriptedGateway::default()),
    );
    let err = service.open_session(None).expect_err("store offline");
    assert!(matches!(
        err,
        RiskServiceError::Session(SessionError::Unavailable(_))
    ));
}
