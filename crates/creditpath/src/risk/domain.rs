use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies one input on the borrower form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorrowerField {
    LoanAmount,
    InterestRate,
    AnnualIncome,
    MonthlyPayment,
    DtiRatio,
    CreditHistoryYears,
    LoanTerm,
    LoanPurpose,
    LoanGrade,
    HomeOwnership,
    State,
}

impl BorrowerField {
    pub const ALL: [BorrowerField; 11] = [
        BorrowerField::LoanAmount,
        BorrowerField::InterestRate,
        BorrowerField::AnnualIncome,
        BorrowerField::MonthlyPayment,
        BorrowerField::DtiRatio,
        BorrowerField::CreditHistoryYears,
        BorrowerField::LoanTerm,
        BorrowerField::LoanPurpose,
        BorrowerField::LoanGrade,
        BorrowerField::HomeOwnership,
        BorrowerField::State,
    ];

    /// Form key as used by the input surface.
    pub const fn key(self) -> &'static str {
        match self {
            BorrowerField::LoanAmount => "loanAmount",
            BorrowerField::InterestRate => "interestRate",
            BorrowerField::AnnualIncome => "annualIncome",
            BorrowerField::MonthlyPayment => "monthlyPayment",
            BorrowerField::DtiRatio => "dtiRatio",
            BorrowerField::CreditHistoryYears => "creditHistoryYears",
            BorrowerField::LoanTerm => "loanTerm",
            BorrowerField::LoanPurpose => "loanPurpose",
            BorrowerField::LoanGrade => "loanGrade",
            BorrowerField::HomeOwnership => "homeOwnership",
            BorrowerField::State => "state",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BorrowerField::LoanAmount => "Loan amount",
            BorrowerField::InterestRate => "Interest rate",
            BorrowerField::AnnualIncome => "Annual income",
            BorrowerField::MonthlyPayment => "Monthly payment",
            BorrowerField::DtiRatio => "DTI ratio",
            BorrowerField::CreditHistoryYears => "Credit history",
            BorrowerField::LoanTerm => "Loan term",
            BorrowerField::LoanPurpose => "Loan purpose",
            BorrowerField::LoanGrade => "Loan grade",
            BorrowerField::HomeOwnership => "Home ownership",
            BorrowerField::State => "State",
        }
    }

    /// Numeric fields carry range rules; the rest are constrained to an enum domain.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            BorrowerField::LoanAmount
                | BorrowerField::InterestRate
                | BorrowerField::AnnualIncome
                | BorrowerField::MonthlyPayment
                | BorrowerField::DtiRatio
                | BorrowerField::CreditHistoryYears
        )
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for BorrowerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raised when a value falls outside one of the enumerated input domains.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("loan term must be 36 or 60 months (found {0})")]
    LoanTerm(u16),
    #[error("unknown loan purpose '{0}'")]
    LoanPurpose(String),
    #[error("unknown loan grade '{0}'")]
    LoanGrade(String),
    #[error("unknown home ownership '{0}'")]
    HomeOwnership(String),
    #[error("unknown US state code '{0}'")]
    State(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum LoanTerm {
    ThirtySixMonths,
    SixtyMonths,
}

impl LoanTerm {
    pub const fn months(self) -> u16 {
        match self {
            LoanTerm::ThirtySixMonths => 36,
            LoanTerm::SixtyMonths => 60,
        }
    }
}

impl TryFrom<u16> for LoanTerm {
    type Error = DomainError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            36 => Ok(LoanTerm::ThirtySixMonths),
            60 => Ok(LoanTerm::SixtyMonths),
            other => Err(DomainError::LoanTerm(other)),
        }
    }
}

impl From<LoanTerm> for u16 {
    fn from(term: LoanTerm) -> Self {
        term.months()
    }
}

impl FromStr for LoanTerm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let months = s
            .trim()
            .parse::<u16>()
            .map_err(|_| DomainError::LoanTerm(0))?;
        Self::try_from(months)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanPurpose {
    #[serde(rename = "Debt Consolidation")]
    DebtConsolidation,
    Wedding,
    Medical,
    Education,
    #[serde(rename = "Home Improvement")]
    HomeImprovement,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 5] = [
        LoanPurpose::DebtConsolidation,
        LoanPurpose::Wedding,
        LoanPurpose::Medical,
        LoanPurpose::Education,
        LoanPurpose::HomeImprovement,
    ];

    /// Category string exactly as the prediction model was trained on.
    pub const fn as_str(self) -> &'static str {
        match self {
            LoanPurpose::DebtConsolidation => "Debt Consolidation",
            LoanPurpose::Wedding => "Wedding",
            LoanPurpose::Medical => "Medical",
            LoanPurpose::Education => "Education",
            LoanPurpose::HomeImprovement => "Home Improvement",
        }
    }
}

impl FromStr for LoanPurpose {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|purpose| purpose.as_str() == s)
            .ok_or_else(|| DomainError::LoanPurpose(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanGrade {
    A,
    B,
    C,
    D,
}

impl LoanGrade {
    pub const fn as_str(self) -> &'static str {
        match self {
            LoanGrade::A => "A",
            LoanGrade::B => "B",
            LoanGrade::C => "C",
            LoanGrade::D => "D",
        }
    }

    /// Grades A and B read as strong credit quality in the narrative.
    pub const fn is_strong(self) -> bool {
        matches!(self, LoanGrade::A | LoanGrade::B)
    }
}

impl FromStr for LoanGrade {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(LoanGrade::A),
            "B" => Ok(LoanGrade::B),
            "C" => Ok(LoanGrade::C),
            "D" => Ok(LoanGrade::D),
            other => Err(DomainError::LoanGrade(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HomeOwnership {
    Rent,
    Own,
    Mortgage,
}

impl HomeOwnership {
    pub const fn as_str(self) -> &'static str {
        match self {
            HomeOwnership::Rent => "Rent",
            HomeOwnership::Own => "Own",
            HomeOwnership::Mortgage => "Mortgage",
        }
    }
}

impl FromStr for HomeOwnership {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rent" => Ok(HomeOwnership::Rent),
            "Own" => Ok(HomeOwnership::Own),
            "Mortgage" => Ok(HomeOwnership::Mortgage),
            other => Err(DomainError::HomeOwnership(other.to_string())),
        }
    }
}

const US_STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Two-letter US state code, forwarded to the prediction service verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StateCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if US_STATE_CODES.contains(&value.as_str()) {
            Ok(Self(value))
        } else {
            Err(DomainError::State(value))
        }
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.0
    }
}

impl FromStr for StateCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Applicant attributes captured by the form, in UI units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerInputs {
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub annual_income: f64,
    pub monthly_payment: f64,
    pub dti_ratio: f64,
    pub credit_history_years: i32,
    pub loan_term: LoanTerm,
    pub loan_purpose: LoanPurpose,
    pub loan_grade: LoanGrade,
    pub home_ownership: HomeOwnership,
    pub state: StateCode,
}

impl Default for BorrowerInputs {
    fn default() -> Self {
        Self {
            loan_amount: 10_000.0,
            interest_rate: 12.5,
            annual_income: 65_000.0,
            monthly_payment: 350.0,
            dti_ratio: 25.0,
            credit_history_years: 8,
            loan_term: LoanTerm::ThirtySixMonths,
            loan_purpose: LoanPurpose::Wedding,
            loan_grade: LoanGrade::B,
            home_ownership: HomeOwnership::Rent,
            state: StateCode("CA".to_string()),
        }
    }
}

impl BorrowerInputs {
    /// Value of a numeric field, or `None` for enum-backed fields.
    pub fn numeric_value(&self, field: BorrowerField) -> Option<f64> {
        match field {
            BorrowerField::LoanAmount => Some(self.loan_amount),
            BorrowerField::InterestRate => Some(self.interest_rate),
            BorrowerField::AnnualIncome => Some(self.annual_income),
            BorrowerField::MonthlyPayment => Some(self.monthly_payment),
            BorrowerField::DtiRatio => Some(self.dti_ratio),
            BorrowerField::CreditHistoryYears => Some(f64::from(self.credit_history_years)),
            _ => None,
        }
    }

    /// Apply one edit from the input surface. The form is left untouched on error.
    pub fn apply(&mut self, field: BorrowerField, value: &FieldValue) -> Result<(), FieldUpdateError> {
        match field {
            BorrowerField::LoanAmount => self.loan_amount = value.number(field)?,
            BorrowerField::InterestRate => self.interest_rate = value.number(field)?,
            BorrowerField::AnnualIncome => self.annual_income = value.number(field)?,
            BorrowerField::MonthlyPayment => self.monthly_payment = value.number(field)?,
            BorrowerField::DtiRatio => self.dti_ratio = value.number(field)?,
            BorrowerField::CreditHistoryYears => {
                let years = value.number(field)?;
                if years.fract() != 0.0 {
                    return Err(FieldUpdateError::NotAWholeNumber { field });
                }
                self.credit_history_years = years as i32;
            }
            BorrowerField::LoanTerm => {
                self.loan_term = match value {
                    FieldValue::Number(months) if months.fract() == 0.0 && *months >= 0.0 => {
                        LoanTerm::try_from(*months as u16)?
                    }
                    FieldValue::Number(months) => {
                        return Err(DomainError::LoanTerm(months.max(0.0) as u16).into())
                    }
                    FieldValue::Text(raw) => raw.parse()?,
                }
            }
            BorrowerField::LoanPurpose => self.loan_purpose = value.text().parse()?,
            BorrowerField::LoanGrade => self.loan_grade = value.text().parse()?,
            BorrowerField::HomeOwnership => self.home_ownership = value.text().parse()?,
            BorrowerField::State => self.state = value.text().parse()?,
        }

        Ok(())
    }
}

/// Raw value as typed or selected on the input surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn number(&self, field: BorrowerField) -> Result<f64, FieldUpdateError> {
        match self {
            FieldValue::Number(value) => Ok(*value),
            FieldValue::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| FieldUpdateError::NotANumber { field }),
        }
    }

    fn text(&self) -> String {
        match self {
            FieldValue::Number(value) => value.to_string(),
            FieldValue::Text(raw) => raw.clone(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// A form edit that could not be applied to the borrower inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldUpdateError {
    #[error("{} must be a number", .field.label())]
    NotANumber { field: BorrowerField },
    #[error("{} must be a whole number", .field.label())]
    NotAWholeNumber { field: BorrowerField },
    #[error(transparent)]
    Domain(#[from] DomainError),
}
