use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BorrowerInputs, FieldValue};
use super::orchestrator::SubmitError;
use super::service::{RiskAssessmentService, RiskServiceError};
use super::sessions::{SessionError, SessionId, SessionStore};

/// Router exposing per-session form editing and submission.
pub fn risk_router<S>(service: Arc<RiskAssessmentService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(open_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id",
            get(session_handler::<S>).delete(close_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/fields/:field",
            put(field_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/submit",
            post(submit_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OpenSessionRequest {
    #[serde(default)]
    pub(crate) inputs: Option<BorrowerInputs>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldUpdateRequest {
    pub(crate) value: FieldValue,
}

pub(crate) async fn open_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    payload: Option<Json<OpenSessionRequest>>,
) -> Response
where
    S: SessionStore + 'static,
{
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    match service.open_session(request.inputs) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.session(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn close_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.close_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn field_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    Path((session_id, field)): Path<(String, String)>,
    Json(request): Json<FieldUpdateRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.update_field(&SessionId(session_id), &field, &request.value) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<RiskAssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.submit(&SessionId(session_id)).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: RiskServiceError) -> Response {
    match err {
        RiskServiceError::Submit(SubmitError::Invalid(field_errors)) => {
            let payload = json!({
                "error": "borrower inputs failed validation",
                "field_errors": field_errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        RiskServiceError::Field(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        RiskServiceError::UnknownField(field) => {
            let payload = json!({ "error": format!("unknown borrower field '{field}'") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        RiskServiceError::Session(SessionError::NotFound) => {
            let payload = json!({ "error": "session not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        RiskServiceError::Session(SessionError::Conflict) => {
            let payload = json!({ "error": "session already exists" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
