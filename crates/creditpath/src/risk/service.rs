use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::domain::{BorrowerField, BorrowerInputs, FieldUpdateError, FieldValue};
use super::gateway::PredictionGateway;
use super::orchestrator::{Completion, SubmissionOrchestrator, SubmitError};
use super::sessions::{SessionError, SessionId, SessionStore};
use super::views::SessionView;

/// Service composing the session store with the prediction collaborator.
pub struct RiskAssessmentService<S> {
    sessions: Arc<S>,
    gateway: Arc<dyn PredictionGateway>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<S> RiskAssessmentService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(sessions: Arc<S>, gateway: Arc<dyn PredictionGateway>) -> Self {
        Self { sessions, gateway }
    }

    /// Start a session, seeded with the form defaults unless inputs are supplied.
    pub fn open_session(
        &self,
        inputs: Option<BorrowerInputs>,
    ) -> Result<SessionView, RiskServiceError> {
        let orchestrator = SubmissionOrchestrator::with_inputs(inputs.unwrap_or_default());
        let id = next_session_id();
        let view = SessionView::from_orchestrator(id.clone(), &orchestrator);
        self.sessions.insert(id, orchestrator)?;
        Ok(view)
    }

    pub fn session(&self, id: &SessionId) -> Result<SessionView, RiskServiceError> {
        let view = self.sessions.with_session(id, |orchestrator| {
            SessionView::from_orchestrator(id.clone(), orchestrator)
        })?;
        Ok(view)
    }

    /// Apply one form edit. Only the edited field is re-validated.
    pub fn update_field(
        &self,
        id: &SessionId,
        field_key: &str,
        value: &FieldValue,
    ) -> Result<SessionView, RiskServiceError> {
        let field = BorrowerField::from_key(field_key)
            .ok_or_else(|| RiskServiceError::UnknownField(field_key.to_string()))?;

        let view = self.sessions.with_session(id, |orchestrator| {
            orchestrator.update_field(field, value)?;
            Ok::<_, FieldUpdateError>(SessionView::from_orchestrator(id.clone(), orchestrator))
        })??;
        Ok(view)
    }

    /// Validate and submit the session's form.
    ///
    /// The session lock is released while the prediction call is in flight, so a later
    /// submission may overtake this one; only the latest submission's response is applied.
    pub async fn submit(&self, id: &SessionId) -> Result<SessionView, RiskServiceError> {
        let ticket = self
            .sessions
            .with_session(id, |orchestrator| orchestrator.begin_submit())??;

        let outcome = self.gateway.predict(ticket.request()).await;

        let view = self.sessions.with_session(id, |orchestrator| {
            if let Completion::Stale { sequence, latest } = orchestrator.complete(ticket, outcome)
            {
                debug!(%id, sequence, latest, "superseded submission ignored");
            }
            SessionView::from_orchestrator(id.clone(), orchestrator)
        })?;
        Ok(view)
    }

    pub fn close_session(&self, id: &SessionId) -> Result<(), RiskServiceError> {
        self.sessions.remove(id)?;
        Ok(())
    }
}

/// Error raised by the risk assessment service.
#[derive(Debug, thiserror::Error)]
pub enum RiskServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("unknown borrower field '{0}'")]
    UnknownField(String),
    #[error(transparent)]
    Field(#[from] FieldUpdateError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}
