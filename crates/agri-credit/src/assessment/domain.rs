use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier wrapper for loan products in the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanProductId(pub String);

impl LoanProductId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoanProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw questionnaire as posted by the assessment form.
///
/// Numeric answers stay untyped until the normalizer has looked at them so a
/// non-numeric entry can be reported against its field instead of failing the
/// whole payload. Flags get the same treatment, since form posts send
/// checkboxes as `"true"` / `"false"`. Unanswered fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    #[serde(default)]
    pub farm_size_hectares: Option<Value>,
    #[serde(default)]
    pub experience_years: Option<Value>,
    #[serde(default)]
    pub crop_count: Option<Value>,

    #[serde(default)]
    pub has_previous_loans: Option<Value>,
    #[serde(default)]
    pub has_bank_statements: Option<Value>,
    #[serde(default)]
    pub has_financial_statements: Option<Value>,
    #[serde(default)]
    pub has_tax_returns: Option<Value>,

    #[serde(default)]
    pub has_market_contracts: Option<Value>,
    #[serde(default)]
    pub has_export_license: Option<Value>,
    #[serde(default)]
    pub has_cooperative_membership: Option<Value>,
    #[serde(default)]
    pub has_direct_market_access: Option<Value>,

    #[serde(default)]
    pub has_irrigation: Option<Value>,
    #[serde(default)]
    pub has_modern_equipment: Option<Value>,
    #[serde(default)]
    pub has_precision_farming: Option<Value>,
    #[serde(default)]
    pub has_digital_tools: Option<Value>,
    #[serde(default)]
    pub has_sustainable_practices: Option<Value>,

    #[serde(default)]
    pub has_crop_insurance: Option<Value>,
    #[serde(default)]
    pub has_equipment_insurance: Option<Value>,
    #[serde(default)]
    pub has_liability_insurance: Option<Value>,
}

impl From<&AssessmentInput> for Questionnaire {
    fn from(input: &AssessmentInput) -> Self {
        Self {
            farm_size_hectares: Some(Value::from(input.farm_size_hectares)),
            experience_years: Some(Value::from(input.experience_years)),
            crop_count: Some(Value::from(input.crop_count)),
            has_previous_loans: Some(Value::Bool(input.has_previous_loans)),
            has_bank_statements: Some(Value::Bool(input.has_bank_statements)),
            has_financial_statements: Some(Value::Bool(input.has_financial_statements)),
            has_tax_returns: Some(Value::Bool(input.has_tax_returns)),
            has_market_contracts: Some(Value::Bool(input.has_market_contracts)),
            has_export_license: Some(Value::Bool(input.has_export_license)),
            has_cooperative_membership: Some(Value::Bool(input.has_cooperative_membership)),
            has_direct_market_access: Some(Value::Bool(input.has_direct_market_access)),
            has_irrigation: Some(Value::Bool(input.has_irrigation)),
            has_modern_equipment: Some(Value::Bool(input.has_modern_equipment)),
            has_precision_farming: Some(Value::Bool(input.has_precision_farming)),
            has_digital_tools: Some(Value::Bool(input.has_digital_tools)),
            has_sustainable_practices: Some(Value::Bool(input.has_sustainable_practices)),
            has_crop_insurance: Some(Value::Bool(input.has_crop_insurance)),
            has_equipment_insurance: Some(Value::Bool(input.has_equipment_insurance)),
            has_liability_insurance: Some(Value::Bool(input.has_liability_insurance)),
        }
    }
}

/// Assessment request: the questionnaire plus the product the farmer is applying for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub product_id: LoanProductId,
    #[serde(flatten)]
    pub questionnaire: Questionnaire,
}

/// Canonical, validated questionnaire consumed by the scoring engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub farm_size_hectares: f64,
    pub experience_years: f64,
    pub crop_count: u32,

    pub has_previous_loans: bool,
    pub has_bank_statements: bool,
    pub has_financial_statements: bool,
    pub has_tax_returns: bool,

    pub has_market_contracts: bool,
    pub has_export_license: bool,
    pub has_cooperative_membership: bool,
    pub has_direct_market_access: bool,

    pub has_irrigation: bool,
    pub has_modern_equipment: bool,
    pub has_precision_farming: bool,
    pub has_digital_tools: bool,
    pub has_sustainable_practices: bool,

    pub has_crop_insurance: bool,
    pub has_equipment_insurance: bool,
    pub has_liability_insurance: bool,
}

impl AssessmentInput {
    pub fn financial_history_flags(&self) -> [bool; 4] {
        [
            self.has_previous_loans,
            self.has_bank_statements,
            self.has_financial_statements,
            self.has_tax_returns,
        ]
    }

    pub fn market_access_flags(&self) -> [bool; 4] {
        [
            self.has_market_contracts,
            self.has_export_license,
            self.has_cooperative_membership,
            self.has_direct_market_access,
        ]
    }

    pub fn technology_flags(&self) -> [bool; 5] {
        [
            self.has_irrigation,
            self.has_modern_equipment,
            self.has_precision_farming,
            self.has_digital_tools,
            self.has_sustainable_practices,
        ]
    }

    pub fn insurance_flags(&self) -> [bool; 3] {
        [
            self.has_crop_insurance,
            self.has_equipment_insurance,
            self.has_liability_insurance,
        ]
    }
}

/// The seven weighted factors of the credit score, in declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    FarmSize,
    Experience,
    FinancialHistory,
    CropDiversification,
    MarketAccess,
    TechnologyAdoption,
    InsuranceCoverage,
}

impl FactorKind {
    pub const ALL: [FactorKind; 7] = [
        FactorKind::FarmSize,
        FactorKind::Experience,
        FactorKind::FinancialHistory,
        FactorKind::CropDiversification,
        FactorKind::MarketAccess,
        FactorKind::TechnologyAdoption,
        FactorKind::InsuranceCoverage,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FactorKind::FarmSize => "Farm size",
            FactorKind::Experience => "Farming experience",
            FactorKind::FinancialHistory => "Financial history",
            FactorKind::CropDiversification => "Crop diversification",
            FactorKind::MarketAccess => "Market access",
            FactorKind::TechnologyAdoption => "Technology adoption",
            FactorKind::InsuranceCoverage => "Insurance coverage",
        }
    }
}

/// Ordered risk tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    LowRisk,
    MediumRisk,
    ModerateRisk,
    HighRisk,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::LowRisk,
        RiskCategory::MediumRisk,
        RiskCategory::ModerateRisk,
        RiskCategory::HighRisk,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RiskCategory::LowRisk => "Low Risk",
            RiskCategory::MediumRisk => "Medium Risk",
            RiskCategory::ModerateRisk => "Moderate Risk",
            RiskCategory::HighRisk => "High Risk",
        }
    }

    /// Display color shared with the marketplace UI.
    pub const fn color(self) -> &'static str {
        match self {
            RiskCategory::LowRisk => "green",
            RiskCategory::MediumRisk => "yellow",
            RiskCategory::ModerateRisk => "orange",
            RiskCategory::HighRisk => "red",
        }
    }
}

/// Eligibility window and pricing of a loan product, owned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanProductConstraints {
    pub min_amount: f64,
    pub max_amount: f64,
    pub base_interest_rate: f64,
    pub min_farm_size: f64,
    pub max_farm_size: f64,
    pub min_experience_years: f64,
}

impl LoanProductConstraints {
    /// Compose the rate offered to the applicant from a tier adjustment.
    pub fn effective_interest_rate(&self, adjustment_percent: f64) -> f64 {
        (self.base_interest_rate + adjustment_percent).max(0.0)
    }
}

/// Catalog entry returned by the loan product registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanProduct {
    pub id: LoanProductId,
    pub name: String,
    pub constraints: LoanProductConstraints,
}
