use super::common::*;
use crate::risk::classifier::RiskTier;
use crate::risk::narrative::{generate, generate_from_profile, FactorProfile, GENERIC_FALLBACK};
use crate::risk::prediction::Decision;

const APPROVED_SUMMARY: &str = "This borrower demonstrates strong creditworthiness with a 25.0% probability of default. The combination of strong loan grade (B), extensive credit history (8 years), healthy debt-to-income ratio (25%), reasonable loan-to-income ratio (15.4%) indicate reliable repayment capacity. Model consensus shows an average default probability of 23.7% across logistic regression, XGBoost, and LightGBM.";

#[test]
fn approved_borrower_gets_full_narrative() {
    let report = generate(&approve_result(), Some(&borrower()));

    assert_eq!(report.summary, APPROVED_SUMMARY);
    assert_eq!(report.tier, RiskTier::Low);
    assert_eq!(report.tier_label, "Low Risk");
    assert_eq!(report.decision, Decision::Approve);
    assert!(!report.summary.contains(GENERIC_FALLBACK));
}

#[test]
fn narrative_is_deterministic() {
    let inputs = borrower();
    let first = generate(&approve_result(), Some(&inputs));
    let second = generate(&approve_result(), Some(&inputs));
    assert_eq!(first, second);
}

#[test]
fn missing_inputs_fall_back_to_service_text() {
    let result = reject_result();
    let report = generate(&result, None);
    assert_eq!(report.summary, "High default risk");
    assert_eq!(report.tier, RiskTier::High);
    assert!(!report.summary.contains("Model consensus"));

    let mut bare = reject_result();
    bare.reason = None;
    assert_eq!(generate(&bare, None).summary, GENERIC_FALLBACK);

    let mut recommended = reject_result();
    recommended.recommendation = Some("Refer to manual underwriting.".to_string());
    assert_eq!(
        generate(&recommended, None).summary,
        "Refer to manual underwriting."
    );
}

#[test]
fn rejected_borrower_gets_high_risk_headline_and_cautious_outlook() {
    let mut inputs = borrower();
    inputs.loan_grade = crate::risk::domain::LoanGrade::D;
    inputs.credit_history_years = 2;
    inputs.dti_ratio = 45.0;
    inputs.loan_amount = 40_000.0;

    let report = generate(&reject_result(), Some(&inputs));
    assert_eq!(
        report.summary,
        "This borrower presents high risk with a 85.0% probability of default. The combination of moderate loan grade (D), limited credit history (2 years), concerning debt-to-income ratio (45%) indicate potential repayment challenges."
    );
}

#[test]
fn single_factor_uses_singular_verb() {
    let profile = FactorProfile {
        credit_history_years: Some(1),
        ..FactorProfile::default()
    };
    let mut result = approve_result();
    result.default_probability = 0.42;
    result.model_comparison = None;

    let report = generate_from_profile(&result, Some(&profile));
    assert_eq!(
        report.summary,
        "This borrower presents moderate risk with a 42.0% probability of default. The combination of limited credit history (1 year) indicates reliable repayment capacity."
    );
}

#[test]
fn empty_profile_still_leads_with_headline() {
    let report = generate_from_profile(&reject_result(), Some(&FactorProfile::default()));
    assert_eq!(
        report.summary,
        "This borrower presents high risk with a 85.0% probability of default."
    );
}
