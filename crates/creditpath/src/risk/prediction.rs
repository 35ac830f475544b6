use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::classifier::{classify, RiskClassification};

/// Approve/reject signal parsed once from the service's free-text action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Any action mentioning "approve" (case-insensitive) approves; everything else rejects.
    pub fn from_action(action: &str) -> Self {
        if action.to_lowercase().contains("approve") {
            Decision::Approve
        } else {
            Decision::Reject
        }
    }

    pub const fn is_approve(self) -> bool {
        matches!(self, Decision::Approve)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Decision::Approve => "Approve",
            Decision::Reject => "Reject",
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            Decision::Approve => "Low Risk",
            Decision::Reject => "High Risk",
        }
    }

    pub const fn guidance(self) -> &'static str {
        match self {
            Decision::Approve => "Borrower meets all criteria. Proceed with loan origination.",
            Decision::Reject => "High risk detected.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    Xgboost,
    Lightgbm,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::LogisticRegression,
        ModelKind::Xgboost,
        ModelKind::Lightgbm,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "Logistic Regression",
            ModelKind::Xgboost => "XGBoost",
            ModelKind::Lightgbm => "LightGBM",
        }
    }

    /// The gradient-boosted LightGBM model drives the final decision.
    pub const fn is_final(self) -> bool {
        matches!(self, ModelKind::Lightgbm)
    }
}

/// Per-model default probabilities in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub logistic_regression: f64,
    pub xgboost: f64,
    pub lightgbm: f64,
}

impl ModelComparison {
    pub fn probability(&self, model: ModelKind) -> f64 {
        match model {
            ModelKind::LogisticRegression => self.logistic_regression,
            ModelKind::Xgboost => self.xgboost,
            ModelKind::Lightgbm => self.lightgbm,
        }
    }

    /// Arithmetic mean of the three model probabilities, in `[0, 1]`.
    pub fn consensus(&self) -> f64 {
        (self.logistic_regression + self.xgboost + self.lightgbm) / 3.0
    }

    pub fn scores(&self) -> Vec<ModelScore> {
        ModelKind::ALL
            .into_iter()
            .map(|model| {
                let probability_pct = self.probability(model) * 100.0;
                ModelScore {
                    model,
                    probability_pct,
                    classification: classify(probability_pct),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelScore {
    pub model: ModelKind,
    pub probability_pct: f64,
    pub classification: RiskClassification,
}

/// Structurally validated response from the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub default_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_comparison: Option<ModelComparison>,
    pub recommended_action: String,
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_model: Option<String>,
}

impl PredictionResult {
    pub fn from_response_body(body: &[u8]) -> Result<Self, MalformedResponse> {
        let raw: RawPredictionResponse = serde_json::from_slice(body)
            .map_err(|err| MalformedResponse(format!("response is not valid JSON: {err}")))?;
        Self::try_from(raw)
    }

    pub fn default_probability_pct(&self) -> f64 {
        self.default_probability * 100.0
    }

    pub fn classification(&self) -> RiskClassification {
        classify(self.default_probability_pct())
    }
}

/// Response body as received, before any field is trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPredictionResponse {
    #[serde(default)]
    pub default_probability: Option<Value>,
    #[serde(default)]
    pub model_comparison: Option<Value>,
    #[serde(default)]
    pub recommended_action: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub final_model: Option<String>,
}

impl TryFrom<RawPredictionResponse> for PredictionResult {
    type Error = MalformedResponse;

    fn try_from(raw: RawPredictionResponse) -> Result<Self, Self::Error> {
        let default_probability = probability_field("default_probability", raw.default_probability)?;

        let model_comparison = match raw.model_comparison {
            None | Some(Value::Null) => None,
            Some(Value::Object(mut models)) => Some(ModelComparison {
                logistic_regression: probability_field(
                    "model_comparison.logistic_regression",
                    models.remove("logistic_regression"),
                )?,
                xgboost: probability_field("model_comparison.xgboost", models.remove("xgboost"))?,
                lightgbm: probability_field(
                    "model_comparison.lightgbm",
                    models.remove("lightgbm"),
                )?,
            }),
            Some(_) => {
                return Err(MalformedResponse(
                    "model_comparison is not an object".to_string(),
                ))
            }
        };

        let recommended_action = raw.recommended_action.unwrap_or_default();
        let decision = Decision::from_action(&recommended_action);

        Ok(PredictionResult {
            default_probability,
            model_comparison,
            recommended_action,
            decision,
            reason: non_blank(raw.reason),
            risk_level: non_blank(raw.risk_level),
            recommendation: non_blank(raw.recommendation),
            final_model: non_blank(raw.final_model),
        })
    }
}

fn probability_field(name: &str, value: Option<Value>) -> Result<f64, MalformedResponse> {
    let value = match value {
        None | Some(Value::Null) => return Err(MalformedResponse(format!("{name} is missing"))),
        Some(value) => value,
    };

    let probability = value
        .as_f64()
        .ok_or_else(|| MalformedResponse(format!("{name} is not a number")))?;

    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(MalformedResponse(format!(
            "{name} {probability} is outside [0, 1]"
        )));
    }

    Ok(probability)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// The service answered, but not with something downstream consumers can trust.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed prediction response: {0}")]
pub struct MalformedResponse(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::classifier::RiskTier;

    #[test]
    fn decision_matches_approve_substring_case_insensitively() {
        assert_eq!(Decision::from_action("Approve"), Decision::Approve);
        assert_eq!(
            Decision::from_action("Approve with Conditions"),
            Decision::Approve
        );
        assert_eq!(Decision::from_action("APPROVED"), Decision::Approve);
        assert_eq!(
            Decision::from_action("Reject or Manual Review"),
            Decision::Reject
        );
        assert_eq!(Decision::from_action(""), Decision::Reject);
    }

    #[test]
    fn parses_full_service_response() {
        let body = br#"{
            "final_model": "LightGBM",
            "default_probability": 0.4123,
            "risk_level": "Medium Risk",
            "recommended_action": "Approve with Conditions",
            "reason": "Moderate default risk",
            "model_comparison": {
                "logistic_regression": 0.3811,
                "xgboost": 0.402,
                "lightgbm": 0.4123
            }
        }"#;

        let result = PredictionResult::from_response_body(body).expect("valid response");
        assert_eq!(result.decision, Decision::Approve);
        assert_eq!(result.final_model.as_deref(), Some("LightGBM"));
        assert_eq!(result.classification().tier, RiskTier::Medium);
        let comparison = result.model_comparison.expect("comparison present");
        assert_eq!(comparison.lightgbm, 0.4123);
    }

    #[test]
    fn missing_or_non_numeric_probability_is_malformed() {
        let missing = PredictionResult::from_response_body(br#"{"recommended_action":"Approve"}"#);
        assert_eq!(
            missing,
            Err(MalformedResponse("default_probability is missing".to_string()))
        );

        let text = PredictionResult::from_response_body(br#"{"default_probability":"0.2"}"#);
        assert_eq!(
            text,
            Err(MalformedResponse(
                "default_probability is not a number".to_string()
            ))
        );

        let out_of_range = PredictionResult::from_response_body(br#"{"default_probability":1.4}"#);
        assert!(out_of_range.is_err());

        assert!(PredictionResult::from_response_body(b"<html>").is_err());
    }

    #[test]
    fn incomplete_model_comparison_is_malformed() {
        let body = br#"{
            "default_probability": 0.2,
            "recommended_action": "Approve",
            "model_comparison": {"logistic_regression": 0.2, "xgboost": 0.21}
        }"#;

        let err = PredictionResult::from_response_body(body).expect_err("lightgbm missing");
        assert!(err.0.contains("model_comparison.lightgbm"));
    }

    #[test]
    fn consensus_averages_three_models() {
        let comparison = ModelComparison {
            logistic_regression: 0.22,
            xgboost: 0.24,
            lightgbm: 0.25,
        };
        assert_eq!(format!("{:.1}", comparison.consensus() * 100.0), "23.7");

        let scores = comparison.scores();
        assert_eq!(scores.len(), 3);
        assert!(scores
            .iter()
            .all(|score| score.classification.tier == RiskTier::Low));
        assert!(scores[2].model.is_final());
    }
}
