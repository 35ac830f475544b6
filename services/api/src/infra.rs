use creditpath::risk::{SessionError, SessionId, SessionStore, SubmissionOrchestrator};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session storage. Sessions vanish on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, SubmissionOrchestrator>>>,
}

impl InMemorySessionStore {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SubmissionOrchestrator>>, SessionError> {
        self.sessions
            .lock()
            .map_err(|_| SessionError::Unavailable("session store mutex poisoned".to_string()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, id: SessionId, orchestrator: SubmissionOrchestrator) -> Result<(), SessionError> {
        let mut guard = self.lock()?;
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
        let mut guard = self.lock()?;
        let orchestrator = guard.get_mut(id).ok_or(SessionError::NotFound)?;
        Ok(f(orchestrator))
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut guard = self.lock()?;
        guard.remove(id).map(|_| ()).ok_or(SessionError::NotFound)
    }
}
