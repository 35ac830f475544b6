//! Risk interpretation layer for the borrower dashboard.
//!
//! Raw form inputs are validated field by field, normalized into the prediction service's
//! request schema, and the returned default probability is classified into a risk tier and
//! explained through a narrative. The orchestrator ties these steps together for one session.

pub mod classifier;
pub mod domain;
pub mod gateway;
pub mod intake;
pub mod narrative;
pub mod normalizer;
pub mod orchestrator;
pub mod prediction;
pub mod router;
pub mod service;
pub mod sessions;
pub mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use classifier::{classify, classify_probability, ColorTag, RiskClassification, RiskTier};
pub use domain::{
    BorrowerField, BorrowerInputs, DomainError, FieldUpdateError, FieldValue, HomeOwnership,
    LoanGrade, LoanPurpose, LoanTerm, StateCode,
};
pub use gateway::{GatewayError, HttpPredictionGateway, PredictionGateway, ServiceHealth};
pub use intake::{BorrowerCsvImporter, IntakeError, IntakeRow};
pub use narrative::{generate, FactorProfile, NarrativeReport};
pub use normalizer::{normalize, PredictionRequest, REQUEST_KEYS};
pub use orchestrator::{
    Completion, RiskAssessment, SubmissionOrchestrator, SubmissionState, SubmissionTicket,
    SubmitError,
};
pub use prediction::{
    Decision, MalformedResponse, ModelComparison, ModelKind, ModelScore, PredictionResult,
    RawPredictionResponse,
};
pub use router::risk_router;
pub use service::{RiskAssessmentService, RiskServiceError};
pub use sessions::{SessionError, SessionId, SessionStore};
pub use validation::{validate, validate_form, ValidationState};
pub use views::{DashboardView, GaugeView, ModelBarView, RecommendationView, SessionView};
