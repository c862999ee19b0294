use crate::infra::{InMemoryLoanProductRegistry, DEFAULT_PRODUCT};
use agri_credit::assessment::{
    AssessmentInput, AssessmentRequest, AssessmentResult, CreditAssessmentService, LoanProduct,
    LoanProductId, Questionnaire, ScoringPolicy,
};
use agri_credit::config::{AppConfig, ConfigError};
use agri_credit::error::AppError;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Questionnaire JSON file; reads stdin when omitted or set to '-'
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Loan product to check eligibility against
    #[arg(long, default_value = DEFAULT_PRODUCT)]
    pub(crate) product: String,
    /// Scoring policy JSON file (defaults to APP_SCORING_POLICY or the standard policy)
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Emit the raw assessment JSON instead of a readable report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PolicyArgs {
    /// Scoring policy JSON file (defaults to APP_SCORING_POLICY or the standard policy)
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Emit the policy as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only score the sample farms against this product
    #[arg(long)]
    pub(crate) product: Option<String>,
    /// Print the factor breakdown for every assessment
    #[arg(long)]
    pub(crate) verbose: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        input,
        product,
        policy,
        json,
    } = args;

    let raw = read_questionnaire(input)?;
    let questionnaire: Questionnaire = serde_json::from_str(&raw)?;
    let service = catalog_service(load_policy(policy)?);
    let request = AssessmentRequest {
        product_id: LoanProductId::new(product),
        questionnaire,
    };

    let result = service.assess(&request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let product = lookup_product(&service, &request.product_id)?;
    render_assessment(&product, &result, true);
    Ok(())
}

pub(crate) fn run_policy(args: PolicyArgs) -> Result<(), AppError> {
    let policy = load_policy(args.policy)?;
    let view = policy.view();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("Scoring policy");
    println!("Factor weights:");
    for factor in &view.factors {
        println!("  - {:<22} {:>3}%", factor.label, factor.weight);
    }
    println!("Risk tiers:");
    for tier in &view.risk_tiers {
        println!(
            "  - {:<14} [{:>5.1}, {:>5.1}) {:<6} rate {:+.1} pts",
            tier.label,
            tier.min_score,
            tier.max_score,
            tier.color,
            tier.interest_rate_adjustment_percent
        );
    }
    println!(
        "Approval floor {:.0} | recommendations below {:.0} | {:.0} per hectare",
        view.minimum_approval_score, view.recommendation_threshold, view.loan_amount_per_hectare
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = catalog_service(ScoringPolicy::standard());
    let products: Vec<LoanProduct> = service
        .products()?
        .into_iter()
        .filter(|product| {
            args.product
                .as_deref()
                .map_or(true, |wanted| product.id.as_str() == wanted)
        })
        .collect();

    if products.is_empty() {
        println!("No loan product matches the requested filter");
        return Ok(());
    }

    println!("Agricultural credit assessment demo");
    for (name, input) in sample_farms() {
        println!("\n{name}");
        for product in &products {
            let request = AssessmentRequest {
                product_id: product.id.clone(),
                questionnaire: Questionnaire::from(&input),
            };
            match service.assess(&request) {
                Ok(result) => render_assessment(product, &result, args.verbose),
                Err(err) => println!("  {}: assessment unavailable ({err})", product.name),
            }
        }
    }

    Ok(())
}

fn catalog_service(policy: ScoringPolicy) -> CreditAssessmentService<InMemoryLoanProductRegistry> {
    CreditAssessmentService::new(Arc::new(InMemoryLoanProductRegistry::standard()), policy)
}

fn load_policy(path: Option<PathBuf>) -> Result<ScoringPolicy, AppError> {
    match path {
        Some(path) => ScoringPolicy::from_path(&path)
            .map_err(|source| AppError::from(ConfigError::ScoringPolicy { path, source })),
        None => Ok(AppConfig::load()?.scoring),
    }
}

fn read_questionnaire(input: Option<PathBuf>) -> Result<String, AppError> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}

fn lookup_product(
    service: &CreditAssessmentService<InMemoryLoanProductRegistry>,
    id: &LoanProductId,
) -> Result<LoanProduct, AppError> {
    let products = service.products()?;
    products
        .into_iter()
        .find(|product| &product.id == id)
        .ok_or_else(|| {
            AppError::from(agri_credit::assessment::AssessmentServiceError::ProductNotFound(
                id.clone(),
            ))
        })
}

fn render_assessment(product: &LoanProduct, result: &AssessmentResult, detailed: bool) {
    let eligibility = &result.eligibility;
    let rate = product
        .constraints
        .effective_interest_rate(eligibility.interest_rate_adjustment_percent);

    println!(
        "  {}: score {:.1} ({}, {}) -> {} | rate {:.1}%",
        product.name,
        result.total_score,
        result.risk_category.label(),
        result.risk_category.color(),
        eligibility.summary(),
        rate
    );

    if !detailed {
        return;
    }

    println!("    Factor breakdown:");
    for component in &result.components {
        println!(
            "      - {:<22} {:>5.1} x {:>2}% = {:>5.2} ({})",
            component.factor.label(),
            component.score,
            component.weight,
            component.weighted,
            component.notes
        );
    }

    if result.recommendations.is_empty() {
        println!("    Recommendations: none");
    } else {
        println!("    Recommendations:");
        for recommendation in &result.recommendations {
            println!("      - {recommendation}");
        }
    }
}

fn sample_farms() -> Vec<(&'static str, AssessmentInput)> {
    vec![
        (
            "Starter plot (2 ha, first season)",
            AssessmentInput {
                farm_size_hectares: 2.0,
                experience_years: 0.5,
                crop_count: 1,
                has_cooperative_membership: true,
                ..AssessmentInput::default()
            },
        ),
        (
            "Family mixed farm (50 ha, 10 years)",
            AssessmentInput {
                farm_size_hectares: 50.0,
                experience_years: 10.0,
                crop_count: 3,
                has_previous_loans: true,
                has_bank_statements: true,
                has_financial_statements: true,
                has_tax_returns: true,
                has_market_contracts: true,
                has_cooperative_membership: true,
                has_irrigation: true,
                has_modern_equipment: true,
                has_digital_tools: true,
                has_crop_insurance: true,
                ..AssessmentInput::default()
            },
        ),
        (
            "Commercial estate (400 ha, 22 years)",
            AssessmentInput {
                farm_size_hectares: 400.0,
                experience_years: 22.0,
                crop_count: 6,
                has_previous_loans: true,
                has_bank_statements: true,
                has_financial_statements: true,
                has_tax_returns: true,
                has_market_contracts: true,
                has_export_license: true,
                has_cooperative_membership: true,
                has_direct_market_access: true,
                has_irrigation: true,
                has_modern_equipment: true,
                has_precision_farming: true,
                has_digital_tools: true,
                has_sustainable_practices: true,
                has_crop_insurance: true,
                has_equipment_insurance: true,
                has_liability_insurance: true,
            },
        ),
    ]
}
