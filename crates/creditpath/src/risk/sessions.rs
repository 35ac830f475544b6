use std::fmt;

use serde::{Deserialize, Serialize};

use super::orchestrator::SubmissionOrchestrator;

/// Identifier wrapper for dashboard sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds one orchestrator per active session. Implementations keep state in memory only.
pub trait SessionStore: Send + Sync {
    fn insert(&self, id: SessionId, orchestrator: SubmissionOrchestrator) -> Result<(), SessionError>;

    /// Run `f` against the session's orchestrator while holding its lock.
    ///
    /// Implementations must not hold the lock across an await point; callers dispatch the
    /// prediction call between two separate `with_session` invocations.
    fn with_session<T, F>(&self, id: &SessionId, f: F) -> Result<T, SessionError>
    where
        F: FnOnce(&mut SubmissionOrchestrator) -> T;

    fn remove(&self, id: &SessionId) -> Result<(), SessionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
