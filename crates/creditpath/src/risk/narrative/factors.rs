use super::FactorProfile;

pub(crate) const EXTENSIVE_HISTORY_YEARS: i32 = 7;
pub(crate) const ADEQUATE_HISTORY_YEARS: i32 = 4;
pub(crate) const HEALTHY_DTI: f64 = 30.0;
pub(crate) const MANAGEABLE_DTI: f64 = 40.0;
pub(crate) const REASONABLE_LOAN_TO_INCOME: f64 = 50.0;

/// Factor clauses in fixed order: grade, credit history, DTI, loan-to-income.
pub(crate) fn factor_clauses(profile: &FactorProfile) -> Vec<String> {
    let mut clauses = Vec::new();

    if let Some(grade) = profile.loan_grade {
        let quality = if grade.is_strong() { "strong" } else { "moderate" };
        clauses.push(format!("{quality} loan grade ({})", grade.as_str()));
    }

    if let Some(years) = profile.credit_history_years {
        let depth = if years >= EXTENSIVE_HISTORY_YEARS {
            "extensive"
        } else if years >= ADEQUATE_HISTORY_YEARS {
            "adequate"
        } else {
            "limited"
        };
        let unit = if years == 1 { "year" } else { "years" };
        clauses.push(format!("{depth} credit history ({years} {unit})"));
    }

    if let Some(dti) = profile.dti_ratio {
        let health = if dti <= HEALTHY_DTI {
            "healthy"
        } else if dti <= MANAGEABLE_DTI {
            "manageable"
        } else {
            "concerning"
        };
        clauses.push(format!("{health} debt-to-income ratio ({dti}%)"));
    }

    // Only a favourable ratio is mentioned; a high ratio produces no clause.
    if let Some(ratio) = loan_to_income_pct(profile) {
        if ratio < REASONABLE_LOAN_TO_INCOME {
            clauses.push(format!("reasonable loan-to-income ratio ({ratio:.1}%)"));
        }
    }

    clauses
}

pub(crate) fn loan_to_income_pct(profile: &FactorProfile) -> Option<f64> {
    let (loan_amount, annual_income) = (profile.loan_amount?, profile.annual_income?);
    let ratio = loan_amount / annual_income * 100.0;
    ratio.is_finite().then_some(ratio)
}
