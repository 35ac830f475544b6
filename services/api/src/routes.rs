use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json};
use creditpath::error::AppError;
use creditpath::risk::narrative::generate_from_profile;
use creditpath::risk::{
    risk_router, validate_form, BorrowerInputs, FactorProfile, GatewayError, NarrativeReport,
    PredictionResult, RawPredictionResponse, RiskAssessmentService, SessionStore,
    ValidationState,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct FormValidationResponse {
    pub(crate) submittable: bool,
    pub(crate) field_errors: ValidationState,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NarrativeRequest {
    pub(crate) result: RawPredictionResponse,
    #[serde(default)]
    pub(crate) inputs: Option<FactorProfile>,
}

pub(crate) fn with_risk_routes<S>(service: Arc<RiskAssessmentService<S>>) -> axum::Router
where
    S: SessionStore + 'static,
{
    risk_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/assessments/validate", post(validate_endpoint))
        .route("/api/v1/assessments/narrative", post(narrative_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn validate_endpoint(
    Json(inputs): Json<BorrowerInputs>,
) -> Json<FormValidationResponse> {
    let field_errors = validate_form(&inputs);
    Json(FormValidationResponse {
        submittable: field_errors.is_submittable(),
        field_errors,
    })
}

/// Narrative for a prediction the caller already holds, with or without the borrower's form.
pub(crate) async fn narrative_endpoint(
    Json(payload): Json<NarrativeRequest>,
) -> Result<Json<NarrativeReport>, AppError> {
    let result = PredictionResult::try_from(payload.result).map_err(GatewayError::from)?;
    Ok(Json(generate_from_profile(&result, payload.inputs.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use creditpath::risk::{LoanGrade, RiskTier};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn raw_result(probability: f64, action: &str) -> RawPredictionResponse {
        RawPredictionResponse {
            default_probability: Some(json!(probability)),
            recommended_action: Some(action.to_string()),
            reason: Some("High default risk".to_string()),
            ..RawPredictionResponse::default()
        }
    }

    #[tokio::test]
    async fn validate_endpoint_reports_every_failing_field() {
        let inputs = BorrowerInputs {
            loan_amount: 500.0,
            monthly_payment: 0.0,
            ..BorrowerInputs::default()
        };

        let Json(body) = validate_endpoint(Json(inputs)).await;
        assert!(!body.submittable);
        assert_eq!(body.field_errors.len(), 2);
    }

    #[tokio::test]
    async fn narrative_endpoint_uses_service_reason_without_inputs() {
        let request = NarrativeRequest {
            result: raw_result(0.85, "Reject"),
            inputs: None,
        };

        let Json(report) = narrative_endpoint(Json(request))
            .await
            .expect("narrative builds");
        assert_eq!(report.summary, "High default risk");
        assert_eq!(report.tier, RiskTier::High);
    }

    #[tokio::test]
    async fn narrative_endpoint_accepts_partial_profile() {
        let request = NarrativeRequest {
            result: raw_result(0.12, "Approve"),
            inputs: Some(FactorProfile {
                loan_grade: Some(LoanGrade::A),
                ..FactorProfile::default()
            }),
        };

        let Json(report) = narrative_endpoint(Json(request))
            .await
            .expect("narrative builds");
        assert_eq!(
            report.summary,
            "This borrower demonstrates strong creditworthiness with a 12.0% probability of default. The combination of strong loan grade (A) indicates reliable repayment capacity."
        );
    }

    #[tokio::test]
    async fn narrative_endpoint_rejects_out_of_range_probability() {
        let request = NarrativeRequest {
            result: raw_result(1.5, "Approve"),
            inputs: None,
        };

        let err = narrative_endpoint(Json(request))
            .await
            .expect_err("probability outside [0, 1]");
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(handle),
        };

        let router = axum::Router::new()
            .route("/ready", get(readiness_endpoint))
            .layer(Extension(state.clone()));
        let response = router
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .readiness
            .store(true, std::sync::atomic::Ordering::Release);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
