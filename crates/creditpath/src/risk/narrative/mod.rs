//! Qualitative analysis summary composed from borrower inputs and model output.

mod factors;

use serde::{Deserialize, Serialize};

use super::classifier::RiskTier;
use super::domain::{BorrowerInputs, LoanGrade};
use super::prediction::{Decision, PredictionResult};

pub const GENERIC_FALLBACK: &str =
    "Risk assessment complete. Review the default probability and model comparison for details.";

/// Borrower factors the narrative can speak to. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorProfile {
    #[serde(default)]
    pub loan_grade: Option<LoanGrade>,
    #[serde(default)]
    pub credit_history_years: Option<i32>,
    #[serde(default)]
    pub dti_ratio: Option<f64>,
    #[serde(default)]
    pub annual_income: Option<f64>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
}

impl From<&BorrowerInputs> for FactorProfile {
    fn from(inputs: &BorrowerInputs) -> Self {
        Self {
            loan_grade: Some(inputs.loan_grade),
            credit_history_years: Some(inputs.credit_history_years),
            dti_ratio: Some(inputs.dti_ratio),
            annual_income: Some(inputs.annual_income),
            loan_amount: Some(inputs.loan_amount),
        }
    }
}

/// Composed narrative plus the key metrics it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeReport {
    pub summary: String,
    pub tier: RiskTier,
    pub tier_label: &'static str,
    pub default_probability_pct: f64,
    pub decision: Decision,
}

pub fn generate(result: &PredictionResult, inputs: Option<&BorrowerInputs>) -> NarrativeReport {
    let profile = inputs.map(FactorProfile::from);
    generate_from_profile(result, profile.as_ref())
}

/// Build the narrative from an explicit factor profile.
///
/// Without a profile the service's own recommendation or reason text is used. With one, the
/// headline comes first, then the factor sentence and the model consensus when available.
/// The headline is always present, so the fallback text never applies to a profiled borrower.
pub fn generate_from_profile(
    result: &PredictionResult,
    profile: Option<&FactorProfile>,
) -> NarrativeReport {
    let probability_pct = result.default_probability_pct();
    let tier = result.classification().tier;

    let summary = match profile {
        None => result
            .recommendation
            .clone()
            .or_else(|| result.reason.clone())
            .unwrap_or_else(|| GENERIC_FALLBACK.to_string()),
        Some(profile) => {
            let mut sentences = vec![headline(tier, probability_pct)];

            let clauses = factors::factor_clauses(profile);
            if !clauses.is_empty() {
                sentences.push(factor_sentence(&clauses, result.decision));
            }

            if let Some(comparison) = &result.model_comparison {
                sentences.push(format!(
                    "Model consensus shows an average default probability of {:.1}% across logistic regression, XGBoost, and LightGBM.",
                    comparison.consensus() * 100.0
                ));
            }

            sentences.join(" ")
        }
    };

    NarrativeReport {
        summary,
        tier,
        tier_label: tier.label(),
        default_probability_pct: probability_pct,
        decision: result.decision,
    }
}

fn headline(tier: RiskTier, probability_pct: f64) -> String {
    match tier {
        RiskTier::Low => format!(
            "This borrower demonstrates strong creditworthiness with a {probability_pct:.1}% probability of default."
        ),
        RiskTier::Medium => format!(
            "This borrower presents moderate risk with a {probability_pct:.1}% probability of default."
        ),
        RiskTier::High => format!(
            "This borrower presents high risk with a {probability_pct:.1}% probability of default."
        ),
    }
}

fn factor_sentence(clauses: &[String], decision: Decision) -> String {
    let verb = if clauses.len() == 1 {
        "indicates"
    } else {
        "indicate"
    };
    let outlook = match decision {
        Decision::Approve => "reliable repayment capacity",
        Decision::Reject => "potential repayment challenges",
    };

    format!(
        "The combination of {} {verb} {outlook}.",
        clauses.join(", ")
    )
}
