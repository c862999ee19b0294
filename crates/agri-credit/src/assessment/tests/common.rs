use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::domain::{
    AssessmentInput, AssessmentRequest, FactorKind, LoanProduct, LoanProductConstraints,
    LoanProductId, Questionnaire,
};
use crate::assessment::registry::{LoanProductRegistry, RegistryError};
use crate::assessment::{
    assessment_router, CreditAssessmentEngine, CreditAssessmentService, ScoringPolicy,
};

pub(super) const SEASONAL: &str = "seasonal-crop-loan";

pub(super) fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 0.05
}

pub(super) fn seasonal_constraints() -> LoanProductConstraints {
    LoanProductConstraints {
        min_amount: 5_000.0,
        max_amount: 500_000.0,
        base_interest_rate: 12.0,
        min_farm_size: 1.0,
        max_farm_size: 1_000.0,
        min_experience_years: 1.0,
    }
}

/// Product with no farm-size or experience window, so only the score gate applies.
pub(super) fn open_constraints() -> LoanProductConstraints {
    LoanProductConstraints {
        min_amount: 0.0,
        max_amount: 10_000_000.0,
        base_interest_rate: 10.0,
        min_farm_size: 0.0,
        max_farm_size: f64::MAX,
        min_experience_years: 0.0,
    }
}

pub(super) fn engine() -> CreditAssessmentEngine {
    CreditAssessmentEngine::new(ScoringPolicy::standard())
}

pub(super) fn blank_input() -> AssessmentInput {
    AssessmentInput::default()
}

pub(super) fn fully_equipped_input() -> AssessmentInput {
    AssessmentInput {
        farm_size_hectares: 100.0,
        experience_years: 20.0,
        crop_count: 10,
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
    }
}

/// Mid-sized holding with complete paperwork but partial market, technology and insurance cover.
pub(super) fn mixed_input() -> AssessmentInput {
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
    }
}

pub(super) const FLAGS: [(&str, FactorKind); 16] = [
    ("has_previous_loans", FactorKind::FinancialHistory),
    ("has_bank_statements", FactorKind::FinancialHistory),
    ("has_financial_statements", FactorKind::FinancialHistory),
    ("has_tax_returns", FactorKind::FinancialHistory),
    ("has_market_contracts", FactorKind::MarketAccess),
    ("has_export_license", FactorKind::MarketAccess),
    ("has_cooperative_membership", FactorKind::MarketAccess),
    ("has_direct_market_access", FactorKind::MarketAccess),
    ("has_irrigation", FactorKind::TechnologyAdoption),
    ("has_modern_equipment", FactorKind::TechnologyAdoption),
    ("has_precision_farming", FactorKind::TechnologyAdoption),
    ("has_digital_tools", FactorKind::TechnologyAdoption),
    ("has_sustainable_practices", FactorKind::TechnologyAdoption),
    ("has_crop_insurance", FactorKind::InsuranceCoverage),
    ("has_equipment_insurance", FactorKind::InsuranceCoverage),
    ("has_liability_insurance", FactorKind::InsuranceCoverage),
];

pub(super) fn raise_flag(input: &mut AssessmentInput, flag: &str) {
    match flag {
        "has_previous_loans" => input.has_previous_loans = true,
        "has_bank_statements" => input.has_bank_statements = true,
        "has_financial_statements" => input.has_financial_statements = true,
        "has_tax_returns" => input.has_tax_returns = true,
        "has_market_contracts" => input.has_market_contracts = true,
        "has_export_license" => input.has_export_license = true,
        "has_cooperative_membership" => input.has_cooperative_membership = true,
        "has_direct_market_access" => input.has_direct_market_access = true,
        "has_irrigation" => input.has_irrigation = true,
        "has_modern_equipment" => input.has_modern_equipment = true,
        "has_precision_farming" => input.has_precision_farming = true,
        "has_digital_tools" => input.has_digital_tools = true,
        "has_sustainable_practices" => input.has_sustainable_practices = true,
        "has_crop_insurance" => input.has_crop_insurance = true,
        "has_equipment_insurance" => input.has_equipment_insurance = true,
        "has_liability_insurance" => input.has_liability_insurance = true,
        other => panic!("unknown flag {other}"),
    }
}

pub(super) fn request(product: &str, input: &AssessmentInput) -> AssessmentRequest {
    AssessmentRequest {
        product_id: LoanProductId::new(product),
        questionnaire: Questionnaire::from(input),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRegistry {
    products: Arc<Mutex<HashMap<LoanProductId, LoanProduct>>>,
}

impl MemoryRegistry {
    pub(super) fn with_seasonal() -> Self {
        let registry = Self::default();
        registry.insert(LoanProduct {
            id: LoanProductId::new(SEASONAL),
            name: "Seasonal crop input loan".to_string(),
            constraints: seasonal_constraints(),
        });
        registry
    }

    pub(super) fn insert(&self, product: LoanProduct) {
        self.products
            .lock()
            .expect("registry mutex poisoned")
            .insert(product.id.clone(), product);
    }
}

impl LoanProductRegistry for MemoryRegistry {
    fn constraints(&self, id: &LoanProductId) -> Result<LoanProductConstraints, RegistryError> {
        let guard = self.products.lock().expect("registry mutex poisoned");
        guard
            .get(id)
            .map(|product| product.constraints.clone())
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    fn products(&self) -> Result<Vec<LoanProduct>, RegistryError> {
        let guard = self.products.lock().expect("registry mutex poisoned");
        let mut products: Vec<_> = guard.values().cloned().collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }
}

pub(super) struct UnavailableRegistry;

impl LoanProductRegistry for UnavailableRegistry {
    fn constraints(&self, _id: &LoanProductId) -> Result<LoanProductConstraints, RegistryError> {
        Err(RegistryError::Unavailable("catalog offline".to_string()))
    }

    fn products(&self) -> Result<Vec<LoanProduct>, RegistryError> {
        Err(RegistryError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) fn build_service() -> (CreditAssessmentService<MemoryRegistry>, Arc<MemoryRegistry>) {
    let registry = Arc::new(MemoryRegistry::with_seasonal());
    let service = CreditAssessmentService::new(registry.clone(), ScoringPolicy::standard());
    (service, registry)
}

pub(super) fn router_with_service(service: CreditAssessmentService<MemoryRegistry>) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
