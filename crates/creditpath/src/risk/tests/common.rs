use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::risk::domain::BorrowerInputs;
use crate::risk::gateway::{GatewayError, PredictionGateway};
use crate::risk::normalizer::PredictionRequest;
use crate::risk::orchestrator::SubmissionOrchestrator;
use crate::risk::prediction::{Decision, ModelComparison, PredictionResult};
use crate::risk::sessions::{SessionError, SessionId, SessionStore};
use crate::risk::{risk_router, RiskAssessmentService};

pub(super) fn borrower() -> BorrowerInputs {
    BorrowerInputs::default()
}

pub(super) fn approve_result() -> PredictionResult {
    PredictionResult {
        default_probability: 0.25,
        model_comparison: Some(ModelComparison {
            logistic_regression: 0.22,
            xgboost: 0.24,
            lightgbm: 0.25,
        }),
        recommended_action: "Approve".to_string(),
        decision: Decision::Approve,
        reason: Some("Low default risk".to_string()),
        risk_level: Some("Low Risk".to_string()),
        recommendation: None,
        final_model: Some("LightGBM".to_string()),
    }
}

pub(super) fn reject_result() -> PredictionResult {
    PredictionResult {
        default_probability: 0.85,
        model_comparison: None,
        recommended_action: "Reject".to_string(),
        decision: Decision::Reject,
        reason: Some("High default risk".to_string()),
        risk_level: Some("High Risk".to_string()),
        recommendation: None,
        final_model: None,
    }
}

#[derive(Default)]
pub(super) struct MemorySessionStore {
    sessions: Mutex<HashMap<SessionId, SubmissionOrchestrator>>,
}

impl SessionStore for MemorySessionStore {
    fn insert(&self, id: SessionId, orchestrator: SubmissionOrchestrator) -> Result<(), SessionError> {
        let mut guard = self.sessions.lock().expect("lock");
        if guard.contains_key(&id) {
            return Err(SessionError::Conflict);
        }
        guard.insert(id, orchestrator);
        Ok(())
    }

    fn with_session<T, F>(&self, id: &SessionId, f: F) -> Result<T, SessionError>
    where
        F: FnOnce(&mut SubmissionOrchestrator) -> T,
    {
        let mut guard = self.sessions.lock().expect("lock");
        let orchestrator = guard.get_mut(id).ok_or(SessionError::NotFound)?;
        Ok(f(orchestrator))
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut guard = self.sessions.lock().expect("lock");
        guard.remove(id).map(|_| ()).ok_or(SessionError::NotFound)
    }
}

pub(super) struct UnavailableSessionStore;

impl SessionStore for UnavailableSessionStore {
    fn insert(&self, _id: SessionId, _orchestrator: SubmissionOrchestrator) -> Result<(), SessionError> {
        Err(SessionError::Unavailable("store offline".to_string()))
    }

    fn with_session<T, F>(&self, _id: &SessionId, _f: F) -> Result<T, SessionError>
    where
        F: FnOnce(&mut SubmissionOrchestrator) -> T,
    {
        Err(SessionError::Unavailable("store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), SessionError> {
        Err(SessionError::Unavailable("store offline".to_string()))
    }
}

/// Replays queued outcomes in order and records every request it receives.
#[derive(Default)]
pub(super) struct ScriptedGateway {
    outcomes: Mutex<VecDeque<Result<PredictionResult, GatewayError>>>,
    requests: Mutex<Vec<PredictionRequest>>,
}

impl ScriptedGateway {
    pub(super) fn with_outcomes(
        outcomes: impl IntoIterator<Item = Result<PredictionResult, GatewayError>>,
    ) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<PredictionRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl PredictionGateway for ScriptedGateway {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, GatewayError> {
        self.requests.lock().expect("lock").push(request.clone());
        self.outcomes
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Transport("no scripted outcome".to_string())))
    }
}

pub(super) fn build_service(
    gateway: Arc<ScriptedGateway>,
) -> Arc<RiskAssessmentService<MemorySessionStore>> {
    Arc::new(RiskAssessmentService::new(
        Arc::new(MemorySessionStore::default()),
        gateway,
    ))
}

pub(super) fn router_with_service(
    service: Arc<RiskAssessmentService<MemorySessionStore>>,
) -> Router {
    risk_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
