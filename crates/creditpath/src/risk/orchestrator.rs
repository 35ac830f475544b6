use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::classifier::RiskClassification;
use super::domain::{BorrowerField, BorrowerInputs, FieldUpdateError, FieldValue};
use super::gateway::{GatewayError, PredictionGateway};
use super::narrative::{generate, NarrativeReport};
use super::normalizer::{normalize, PredictionRequest};
use super::prediction::PredictionResult;
use super::validation::{validate_form, ValidationState};

/// Where the latest submission stands. Each new submission replaces the previous state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    NotStarted,
    Pending {
        sequence: u64,
    },
    Resolved {
        assessment: Box<RiskAssessment>,
    },
    Failed {
        sequence: u64,
        message: String,
    },
}

/// Everything derived from one successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub sequence: u64,
    pub inputs: BorrowerInputs,
    pub result: PredictionResult,
    pub classification: RiskClassification,
    pub narrative: NarrativeReport,
    pub assessed_at: DateTime<Utc>,
}

/// Handle for one dispatched submission, carrying the snapshot it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTicket {
    sequence: u64,
    inputs: BorrowerInputs,
    request: PredictionRequest,
}

impl SubmissionTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn request(&self) -> &PredictionRequest {
        &self.request
    }

    pub fn inputs(&self) -> &BorrowerInputs {
        &self.inputs
    }
}

/// Whether a completed call was allowed to update the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale { sequence: u64, latest: u64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("borrower inputs failed validation ({} field(s))", .0.len())]
    Invalid(ValidationState),
}

/// Owns one session's form, field errors, and submission state.
///
/// Responses are matched against a monotonically increasing sequence number so that only the
/// most recent submission can update the session, whatever order responses arrive in.
#[derive(Debug, Clone, Default)]
pub struct SubmissionOrchestrator {
    inputs: BorrowerInputs,
    validation: ValidationState,
    state: SubmissionState,
    latest_sequence: u64,
}

impl SubmissionOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(inputs: BorrowerInputs) -> Self {
        Self {
            validation: validate_form(&inputs),
            inputs,
            state: SubmissionState::NotStarted,
            latest_sequence: 0,
        }
    }

    pub fn inputs(&self) -> &BorrowerInputs {
        &self.inputs
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SubmissionState::Pending { .. })
    }

    pub fn assessment(&self) -> Option<&RiskAssessment> {
        match &self.state {
            SubmissionState::Resolved { assessment } => Some(assessment),
            _ => None,
        }
    }

    /// Apply one edit and re-validate only that field.
    pub fn update_field(
        &mut self,
        field: BorrowerField,
        value: &FieldValue,
    ) -> Result<Option<&str>, FieldUpdateError> {
        self.inputs.apply(field, value)?;
        Ok(self.validation.revalidate(field, &self.inputs))
    }

    /// Validate the whole form and, when it passes, mark a new submission as pending.
    ///
    /// A blocked submission leaves the submission state as it was.
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, SubmitError> {
        self.validation = validate_form(&self.inputs);
        if !self.validation.is_submittable() {
            debug!(
                invalid_fields = self.validation.len(),
                "submission blocked by validation"
            );
            return Err(SubmitError::Invalid(self.validation.clone()));
        }

        self.latest_sequence += 1;
        let sequence = self.latest_sequence;
        self.state = SubmissionState::Pending { sequence };
        debug!(sequence, "submission dispatched");

        Ok(SubmissionTicket {
            sequence,
            inputs: self.inputs.clone(),
            request: normalize(&self.inputs),
        })
    }

    /// Record the outcome of a dispatched call unless a newer submission superseded it.
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<PredictionResult, GatewayError>,
    ) -> Completion {
        let SubmissionTicket {
            sequence, inputs, ..
        } = ticket;

        if sequence != self.latest_sequence {
            debug!(
                sequence,
                latest = self.latest_sequence,
                "discarding stale prediction response"
            );
            return Completion::Stale {
                sequence,
                latest: self.latest_sequence,
            };
        }

        self.state = match outcome {
            Ok(result) => {
                let classification = result.classification();
                let narrative = generate(&result, Some(&inputs));
                info!(
                    sequence,
                    tier = classification.label(),
                    decision = result.decision.label(),
                    "risk assessment resolved"
                );
                SubmissionState::Resolved {
                    assessment: Box::new(RiskAssessment {
                        sequence,
                        inputs,
                        result,
                        classification,
                        narrative,
                        assessed_at: Utc::now(),
                    }),
                }
            }
            Err(err) => {
                warn!(sequence, %err, "risk assessment failed");
                SubmissionState::Failed {
                    sequence,
                    message: err.to_string(),
                }
            }
        };

        Completion::Applied
    }

    /// Validate, call the gateway, and record the outcome in one step.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<&SubmissionState, SubmitError>
    where
        G: PredictionGateway + ?Sized,
    {
        let ticket = self.begin_submit()?;
        let outcome = gateway.predict(ticket.request()).await;
        self.complete(ticket, outcome);
        Ok(&self.state)
    }
}
