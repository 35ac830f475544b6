use clap::Args;
use creditpath::config::AppConfig;
use creditpath::error::AppError;
use creditpath::risk::{
    BorrowerCsvImporter, BorrowerInputs, DashboardView, HomeOwnership, HttpPredictionGateway,
    LoanGrade, LoanPurpose, LoanTerm, PredictionGateway, StateCode, SubmissionOrchestrator,
    SubmissionState, SubmitError, ValidationState,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// CSV file of borrowers with headers named after the form fields
    #[arg(long, conflicts_with_all = ["loan_amount", "interest_rate", "annual_income", "monthly_payment", "dti_ratio", "credit_history_years", "loan_term", "loan_purpose", "loan_grade", "home_ownership", "state"])]
    pub(crate) csv: Option<PathBuf>,
    /// Override the prediction service base URL
    #[arg(long)]
    pub(crate) prediction_url: Option<String>,
    /// Loan amount in dollars (default 10000)
    #[arg(long)]
    pub(crate) loan_amount: Option<f64>,
    /// Interest rate in percent (default 12.5)
    #[arg(long)]
    pub(crate) interest_rate: Option<f64>,
    /// Annual income in dollars (default 65000)
    #[arg(long)]
    pub(crate) annual_income: Option<f64>,
    /// Monthly payment in dollars (default 350)
    #[arg(long)]
    pub(crate) monthly_payment: Option<f64>,
    /// Debt-to-income ratio in percent (default 25)
    #[arg(long)]
    pub(crate) dti_ratio: Option<f64>,
    /// Credit history length in whole years (default 8)
    #[arg(long)]
    pub(crate) credit_history_years: Option<i32>,
    /// Loan term in months, 36 or 60 (default 36)
    #[arg(long)]
    pub(crate) loan_term: Option<LoanTerm>,
    /// Loan purpose, e.g. "Debt Consolidation" (default Wedding)
    #[arg(long)]
    pub(crate) loan_purpose: Option<LoanPurpose>,
    /// Loan grade A-D (default B)
    #[arg(long)]
    pub(crate) loan_grade: Option<LoanGrade>,
    /// Rent, Own or Mortgage (default Rent)
    #[arg(long)]
    pub(crate) home_ownership: Option<HomeOwnership>,
    /// Two-letter state code (default CA)
    #[arg(long)]
    pub(crate) state: Option<StateCode>,
}

impl AssessArgs {
    fn borrower(&self) -> BorrowerInputs {
        let mut inputs = BorrowerInputs::default();
        if let Some(value) = self.loan_amount {
            inputs.loan_amount = value;
        }
        if let Some(value) = self.interest_rate {
            inputs.interest_rate = value;
        }
        if let Some(value) = self.annual_income {
            inputs.annual_income = value;
        }
        if let Some(value) = self.monthly_payment {
            inputs.monthly_payment = value;
        }
        if let Some(value) = self.dti_ratio {
            inputs.dti_ratio = value;
        }
        if let Some(value) = self.credit_history_years {
            inputs.credit_history_years = value;
        }
        if let Some(value) = self.loan_term {
            inputs.loan_term = value;
        }
        if let Some(value) = self.loan_purpose {
            inputs.loan_purpose = value;
        }
        if let Some(value) = self.loan_grade {
            inputs.loan_grade = value;
        }
        if let Some(value) = self.home_ownership {
            inputs.home_ownership = value;
        }
        if let Some(value) = &self.state {
            inputs.state = value.clone();
        }
        inputs
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct StatusArgs {
    /// Override the prediction service base URL
    #[arg(long)]
    pub(crate) prediction_url: Option<String>,
}

fn gateway_from_config(prediction_url: Option<String>) -> Result<HttpPredictionGateway, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(url) = prediction_url {
        config.prediction.base_url = url;
        config.prediction.validate()?;
    }
    Ok(HttpPredictionGateway::new(&config.prediction)?)
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<ExitCode, AppError> {
    let gateway = gateway_from_config(args.prediction_url.clone())?;

    match &args.csv {
        Some(path) => run_batch(path, &gateway).await,
        None => {
            let outcome = assess_borrower(args.borrower(), &gateway).await;
            println!("{}", outcome.render());
            Ok(outcome.exit_code())
        }
    }
}

async fn run_batch<G>(path: &Path, gateway: &G) -> Result<ExitCode, AppError>
where
    G: PredictionGateway + ?Sized,
{
    let rows = BorrowerCsvImporter::from_path(path)?;
    println!("Assessing {} borrower row(s) from {}", rows.len(), path.display());

    let mut assessed = 0usize;
    for row in rows {
        let inputs = match row.inputs {
            Ok(inputs) => inputs,
            Err(message) => {
                println!("\nRow {}: skipped ({message})", row.line);
                continue;
            }
        };

        let outcome = assess_borrower(inputs, gateway).await;
        if matches!(outcome, AssessOutcome::Assessed(_)) {
            assessed += 1;
        }
        println!("\nRow {}:\n{}", row.line, outcome.render());
    }

    println!("\n{assessed} row(s) assessed");
    Ok(ExitCode::SUCCESS)
}

pub(crate) enum AssessOutcome {
    Assessed(Box<DashboardView>),
    Blocked(ValidationState),
    Failed(String),
}

impl AssessOutcome {
    fn exit_code(&self) -> ExitCode {
        match self {
            AssessOutcome::Assessed(_) => ExitCode::SUCCESS,
            AssessOutcome::Blocked(_) => ExitCode::from(2),
            AssessOutcome::Failed(_) => ExitCode::FAILURE,
        }
    }

    pub(crate) fn render(&self) -> String {
        match self {
            AssessOutcome::Assessed(dashboard) => render_dashboard(dashboard),
            AssessOutcome::Blocked(errors) => {
                let mut lines = vec!["Submission blocked by validation:".to_string()];
                lines.extend(
                    errors
                        .iter()
                        .map(|(field, message)| format!("  - {}: {message}", field.key())),
                );
                lines.join("\n")
            }
            AssessOutcome::Failed(message) => message.clone(),
        }
    }
}

pub(crate) async fn assess_borrower<G>(inputs: BorrowerInputs, gateway: &G) -> AssessOutcome
where
    G: PredictionGateway + ?Sized,
{
    let mut orchestrator = SubmissionOrchestrator::with_inputs(inputs);
    if let Err(SubmitError::Invalid(errors)) = orchestrator.submit(gateway).await {
        return AssessOutcome::Blocked(errors);
    }

    match orchestrator.state() {
        SubmissionState::Resolved { assessment } => {
            AssessOutcome::Assessed(Box::new(DashboardView::from_assessment(assessment)))
        }
        SubmissionState::Failed { message, .. } => AssessOutcome::Failed(message.clone()),
        SubmissionState::NotStarted | SubmissionState::Pending { .. } => {
            AssessOutcome::Failed("Prediction did not complete".to_string())
        }
    }
}

fn render_dashboard(dashboard: &DashboardView) -> String {
    let mut lines = vec![format!(
        "Default probability: {} ({})",
        dashboard.gauge.display, dashboard.gauge.label
    )];

    if let Some(bars) = &dashboard.model_comparison {
        lines.push("Model comparison:".to_string());
        for bar in bars {
            let marker = if bar.is_final { " [final]" } else { "" };
            lines.push(format!("  {:<20} {:>6}{marker}", bar.label, bar.display));
        }
    }

    let recommendation = &dashboard.recommendation;
    lines.push(format!(
        "Recommendation: {} ({}) - {}",
        recommendation.action, recommendation.badge, recommendation.guidance
    ));
    lines.push(format!("Analysis: {}", dashboard.analysis_summary));
    lines.join("\n")
}

pub(crate) async fn run_status(args: StatusArgs) -> Result<ExitCode, AppError> {
    let gateway = gateway_from_config(args.prediction_url)?;
    let health = gateway.health().await?;

    println!("Prediction service at {}: {}", gateway.base_url(), health.status);
    if health.models.is_empty() {
        println!("No models reported");
    } else {
        println!("Models: {}", health.models.join(", "));
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use creditpath::risk::{GatewayError, PredictionRequest, PredictionResult};

    struct FixedGateway(Result<&'static str, GatewayError>);

    #[async_trait]
    impl PredictionGateway for FixedGateway {
        async fn predict(
            &self,
            _request: &PredictionRequest,
        ) -> Result<PredictionResult, GatewayError> {
            let body = self.0.clone()?;
            Ok(PredictionResult::from_response_body(body.as_bytes())?)
        }
    }

    const APPROVED: &str = r#"{
        "final_model": "LightGBM",
        "default_probability": 0.25,
        "recommended_action": "Approve",
        "model_comparison": {"logistic_regression": 0.22, "xgboost": 0.24, "lightgbm": 0.25}
    }"#;

    #[tokio::test]
    async fn renders_full_dashboard_for_valid_borrower() {
        let outcome = assess_borrower(BorrowerInputs::default(), &FixedGateway(Ok(APPROVED))).await;
        let rendered = outcome.render();

        assert!(rendered.contains("Default probability: 25.0% (Low Risk)"));
        assert!(rendered.contains("LightGBM"));
        assert!(rendered.contains("[final]"));
        assert!(rendered.contains(
            "Recommendation: Approve (Low Risk) - Borrower meets all criteria. Proceed with loan origination."
        ));
        assert!(rendered.contains("Model consensus shows an average default probability of 23.7%"));
        assert!(matches!(outcome, AssessOutcome::Assessed(_)));
    }

    #[tokio::test]
    async fn blocked_borrower_lists_field_errors() {
        let args = AssessArgs {
            loan_amount: Some(500.0),
            ..AssessArgs::default()
        };
        let outcome = assess_borrower(args.borrower(), &FixedGateway(Ok(APPROVED))).await;
        assert!(outcome
            .render()
            .contains("loanAmount: Loan amount must be ≥ $1,000"));
        assert!(matches!(outcome, AssessOutcome::Blocked(_)));
    }

    #[tokio::test]
    async fn gateway_failure_prints_banner_message() {
        let gateway = FixedGateway(Err(GatewayError::Transport("connection refused".to_string())));
        let outcome = assess_borrower(BorrowerInputs::default(), &gateway).await;
        assert_eq!(outcome.render(), "Prediction failed: connection refused");
        assert!(matches!(outcome, AssessOutcome::Failed(_)));
    }
}
