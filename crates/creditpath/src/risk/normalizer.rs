use serde::{Deserialize, Serialize};

use super::domain::BorrowerInputs;

/// Keys the prediction service accepts. Anything else is a hard request error upstream.
pub const REQUEST_KEYS: [&str; 11] = [
    "purpose",
    "grade",
    "residentialstate",
    "homeownership",
    "loanamount",
    "interestrate",
    "monthlypayment",
    "annualincome",
    "dtiratio",
    "lengthcredithistory",
    "term_months",
];

/// Flat request body for `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionRequest {
    pub purpose: String,
    pub grade: String,
    pub residentialstate: String,
    pub homeownership: String,
    pub loanamount: f64,
    pub interestrate: f64,
    pub monthlypayment: f64,
    pub annualincome: f64,
    pub dtiratio: f64,
    pub lengthcredithistory: i64,
    pub term_months: u16,
}

impl PredictionRequest {
    /// Every numeric field holds a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.loanamount,
            self.interestrate,
            self.monthlypayment,
            self.annualincome,
            self.dtiratio,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}

/// Map form fields onto the service schema.
///
/// Category strings are forwarded with their exact casing since the model was trained on
/// those literals.
pub fn normalize(inputs: &BorrowerInputs) -> PredictionRequest {
    PredictionRequest {
        purpose: inputs.loan_purpose.as_str().to_string(),
        grade: inputs.loan_grade.as_str().to_string(),
        residentialstate: inputs.state.as_str().to_string(),
        homeownership: inputs.home_ownership.as_str().to_string(),
        loanamount: inputs.loan_amount,
        interestrate: inputs.interest_rate,
        monthlypayment: inputs.monthly_payment,
        annualincome: inputs.annual_income,
        dtiratio: inputs.dti_ratio,
        lengthcredithistory: i64::from(inputs.credit_history_years),
        term_months: inputs.loan_term.months(),
    }
}
