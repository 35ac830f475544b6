use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{BorrowerField, BorrowerInputs};

pub const LOAN_AMOUNT_MESSAGE: &str = "Loan amount must be ≥ $1,000";
pub const INTEREST_RATE_MESSAGE: &str = "Interest rate must be between 1% and 36%";
pub const ANNUAL_INCOME_MESSAGE: &str = "Annual income must be ≥ $5,000";
pub const MONTHLY_PAYMENT_MESSAGE: &str = "Monthly payment must be > 0";
pub const DTI_RATIO_MESSAGE: &str = "DTI ratio must be between 0% and 60%";
pub const CREDIT_HISTORY_MESSAGE: &str = "Credit history must be between 0 and 40 years";

/// Check a single field value against its range rule.
///
/// Rules are field-local: no field's verdict depends on another field. Enum-backed fields are
/// constrained by the input surface and always pass. Non-finite values fail every numeric rule.
pub fn validate(field: BorrowerField, value: f64) -> Option<&'static str> {
    let within = |lower: f64, upper: f64| value.is_finite() && value >= lower && value <= upper;

    match field {
        BorrowerField::LoanAmount => {
            (!within(1_000.0, f64::INFINITY)).then_some(LOAN_AMOUNT_MESSAGE)
        }
        BorrowerField::InterestRate => (!within(1.0, 36.0)).then_some(INTEREST_RATE_MESSAGE),
        BorrowerField::AnnualIncome => {
            (!within(5_000.0, f64::INFINITY)).then_some(ANNUAL_INCOME_MESSAGE)
        }
        BorrowerField::MonthlyPayment => {
            (!(value.is_finite() && value > 0.0)).then_some(MONTHLY_PAYMENT_MESSAGE)
        }
        BorrowerField::DtiRatio => (!within(0.0, 60.0)).then_some(DTI_RATIO_MESSAGE),
        BorrowerField::CreditHistoryYears => {
            (!within(0.0, 40.0)).then_some(CREDIT_HISTORY_MESSAGE)
        }
        BorrowerField::LoanTerm
        | BorrowerField::LoanPurpose
        | BorrowerField::LoanGrade
        | BorrowerField::HomeOwnership
        | BorrowerField::State => None,
    }
}

/// Run every field rule over the form.
pub fn validate_form(inputs: &BorrowerInputs) -> ValidationState {
    let mut state = ValidationState::default();
    for field in BorrowerField::ALL {
        state.revalidate(field, inputs);
    }
    state
}

/// Field name to error message. A form with any entry is not submittable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationState {
    errors: BTreeMap<BorrowerField, String>,
}

impl ValidationState {
    /// Recompute the message for one field, leaving every other entry untouched.
    pub fn revalidate(&mut self, field: BorrowerField, inputs: &BorrowerInputs) -> Option<&str> {
        let message = inputs
            .numeric_value(field)
            .and_then(|value| validate(field, value));

        match message {
            Some(message) => {
                self.errors.insert(field, message.to_string());
            }
            None => {
                self.errors.remove(&field);
            }
        }

        self.error_for(field)
    }

    pub fn error_for(&self, field: BorrowerField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_submittable(&self) -> bool {
        self.errors.values().all(|message| message.is_empty())
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BorrowerField, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}
