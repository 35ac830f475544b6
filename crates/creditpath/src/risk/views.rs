use serde::Serialize;

use super::classifier::{ColorTag, RiskTier};
use super::domain::BorrowerInputs;
use super::orchestrator::{RiskAssessment, SubmissionOrchestrator, SubmissionState};
use super::prediction::{Decision, ModelKind};
use super::sessions::SessionId;
use super::validation::ValidationState;

/// Public payload describing a session, shaped after the dashboard panels.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub inputs: BorrowerInputs,
    pub field_errors: ValidationState,
    pub submittable: bool,
    pub loading: bool,
    pub state: SubmissionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardView>,
}

impl SessionView {
    pub fn from_orchestrator(session_id: SessionId, orchestrator: &SubmissionOrchestrator) -> Self {
        let error = match orchestrator.state() {
            SubmissionState::Failed { message, .. } => Some(message.clone()),
            _ => None,
        };

        Self {
            session_id,
            inputs: orchestrator.inputs().clone(),
            field_errors: orchestrator.validation().clone(),
            submittable: orchestrator.validation().is_submittable(),
            loading: orchestrator.is_loading(),
            state: orchestrator.state().clone(),
            error,
            dashboard: orchestrator.assessment().map(DashboardView::from_assessment),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub gauge: GaugeView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_comparison: Option<Vec<ModelBarView>>,
    pub recommendation: RecommendationView,
    pub analysis_summary: String,
}

impl DashboardView {
    pub fn from_assessment(assessment: &RiskAssessment) -> Self {
        let probability_pct = assessment.result.default_probability_pct();
        let gauge = GaugeView {
            probability_pct,
            display: format!("{probability_pct:.1}%"),
            tier: assessment.classification.tier,
            label: assessment.classification.label(),
            color: assessment.classification.color,
            color_hex: assessment.classification.color.hex(),
        };

        let model_comparison = assessment.result.model_comparison.map(|comparison| {
            comparison
                .scores()
                .into_iter()
                .map(|score| ModelBarView {
                    model: score.model,
                    label: score.model.label(),
                    probability_pct: score.probability_pct,
                    display: format!("{:.1}%", score.probability_pct),
                    color: score.classification.color,
                    color_hex: score.classification.color.hex(),
                    is_final: score.model.is_final(),
                })
                .collect()
        });

        let decision = assessment.result.decision;
        let recommendation = RecommendationView {
            decision,
            action: decision.label(),
            badge: decision.badge(),
            guidance: decision.guidance(),
        };

        Self {
            gauge,
            model_comparison,
            recommendation,
            analysis_summary: assessment.narrative.summary.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeView {
    pub probability_pct: f64,
    pub display: String,
    pub tier: RiskTier,
    pub label: &'static str,
    pub color: ColorTag,
    pub color_hex: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelBarView {
    pub model: ModelKind,
    pub label: &'static str,
    pub probability_pct: f64,
    pub display: String,
    pub color: ColorTag,
    pub color_hex: &'static str,
    pub is_final: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub decision: Decision,
    pub action: &'static str,
    pub badge: &'static str,
    pub guidance: &'static str,
}
