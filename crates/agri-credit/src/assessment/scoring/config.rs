use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::super::domain::{FactorKind, RiskCategory};

/// Declarative policy tables behind every assessment.
///
/// One value feeds both the engine and the UI-facing policy view, so the tier
/// a farmer is shown is always the tier the engine decided on. Any field left
/// out of a policy file keeps its standard value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub weights: FactorWeights,
    pub saturation: SaturationPoints,
    pub risk_thresholds: RiskThresholds,
    pub rate_adjustments: RateAdjustments,
    pub loan_amount_per_hectare: f64,
    pub minimum_approval_score: f64,
    pub recommendation_threshold: f64,
    pub recommendations: BTreeMap<FactorKind, String>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringPolicy {
    pub fn standard() -> Self {
        let recommendations = FactorKind::ALL
            .iter()
            .map(|kind| (*kind, standard_recommendation(*kind).to_string()))
            .collect();

        Self {
            weights: FactorWeights::default(),
            saturation: SaturationPoints::default(),
            risk_thresholds: RiskThresholds::default(),
            rate_adjustments: RateAdjustments::default(),
            loan_amount_per_hectare: 5000.0,
            minimum_approval_score: 50.0,
            recommendation_threshold: 70.0,
            recommendations,
        }
    }

    /// Parse and validate a JSON policy document.
    pub fn from_json(raw: &str) -> Result<Self, PolicyError> {
        let mut policy: ScoringPolicy = serde_json::from_str(raw)?;
        for kind in FactorKind::ALL {
            policy
                .recommendations
                .entry(kind)
                .or_insert_with(|| standard_recommendation(kind).to_string());
        }
        policy.validate().map_err(PolicyError::Invalid)?;
        Ok(policy)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Check every table at once and report all problems, not only the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let total = self.weights.total();
        if total != 100 {
            errors.push(format!("weights: must sum to 100, found {total}"));
        }

        let saturation = [
            ("farm_size_hectares", self.saturation.farm_size_hectares),
            ("experience_years", self.saturation.experience_years),
        ];
        for (name, value) in saturation {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("saturation.{name}: must be a positive number"));
            }
        }
        if self.saturation.crop_count == 0 {
            errors.push("saturation.crop_count: must be at least 1".to_string());
        }

        let RiskThresholds {
            low_risk,
            medium_risk,
            moderate_risk,
        } = self.risk_thresholds;
        let ordered = low_risk <= 100.0
            && low_risk > medium_risk
            && medium_risk > moderate_risk
            && moderate_risk > 0.0;
        if !ordered {
            errors.push(format!(
                "risk_thresholds: expected 100 >= low ({low_risk}) > medium ({medium_risk}) > moderate ({moderate_risk}) > 0"
            ));
        }

        for category in RiskCategory::ALL {
            if !self.rate_adjustments.for_category(category).is_finite() {
                errors.push(format!(
                    "rate_adjustments.{}: must be a finite number",
                    category.label()
                ));
            }
        }

        if !self.loan_amount_per_hectare.is_finite() || self.loan_amount_per_hectare < 0.0 {
            errors.push("loan_amount_per_hectare: must be a non-negative number".to_string());
        }
        if !(0.0..=100.0).contains(&self.minimum_approval_score) {
            errors.push("minimum_approval_score: must be within 0-100".to_string());
        } else if self.minimum_approval_score < moderate_risk {
            errors.push(format!(
                "minimum_approval_score: must not be below the high risk boundary ({moderate_risk})"
            ));
        }
        if !(0.0..=100.0).contains(&self.recommendation_threshold) {
            errors.push("recommendation_threshold: must be within 0-100".to_string());
        }

        for kind in FactorKind::ALL {
            let present = self
                .recommendations
                .get(&kind)
                .map(|text| !text.trim().is_empty())
                .unwrap_or(false);
            if !present {
                errors.push(format!(
                    "recommendations: missing text for {}",
                    kind.label().to_lowercase()
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn recommendation_for(&self, kind: FactorKind) -> &str {
        self.recommendations
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| standard_recommendation(kind))
    }

    /// Tier table ordered best first, with the half-open score range of each tier.
    pub fn risk_tiers(&self) -> Vec<RiskTierView> {
        let thresholds = &self.risk_thresholds;
        let bounds = [
            (RiskCategory::LowRisk, thresholds.low_risk, 100.0),
            (
                RiskCategory::MediumRisk,
                thresholds.medium_risk,
                thresholds.low_risk,
            ),
            (
                RiskCategory::ModerateRisk,
                thresholds.moderate_risk,
                thresholds.medium_risk,
            ),
            (RiskCategory::HighRisk, 0.0, thresholds.moderate_risk),
        ];

        bounds
            .into_iter()
            .map(|(category, min_score, max_score)| RiskTierView {
                category,
                label: category.label(),
                color: category.color(),
                min_score,
                max_score,
                interest_rate_adjustment_percent: self.rate_adjustments.for_category(category),
            })
            .collect()
    }

    pub fn view(&self) -> PolicyView {
        let factors = self
            .weights
            .ranked()
            .into_iter()
            .map(|(factor, weight)| FactorWeightView {
                factor,
                label: factor.label(),
                weight,
            })
            .collect();

        PolicyView {
            factors,
            risk_tiers: self.risk_tiers(),
            minimum_approval_score: self.minimum_approval_score,
            recommendation_threshold: self.recommendation_threshold,
            loan_amount_per_hectare: self.loan_amount_per_hectare,
        }
    }
}

fn standard_recommendation(kind: FactorKind) -> &'static str {
    match kind {
        FactorKind::FarmSize => {
            "Formalise land tenure or expand cultivated area to strengthen your farm size profile"
        }
        FactorKind::Experience => {
            "Document your farming history and complete agricultural training to demonstrate experience"
        }
        FactorKind::FinancialHistory => {
            "Provide bank statements and tax returns to strengthen financial history"
        }
        FactorKind::CropDiversification => {
            "Diversify into additional crop types to reduce production risk"
        }
        FactorKind::MarketAccess => {
            "Secure market contracts or join a cooperative to improve market access"
        }
        FactorKind::TechnologyAdoption => {
            "Invest in irrigation and digital farm management tools to improve technology adoption"
        }
        FactorKind::InsuranceCoverage => {
            "Obtain crop and equipment insurance to protect against production losses"
        }
    }
}

/// Integer weights per factor; a valid policy sums to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub farm_size: u8,
    pub experience: u8,
    pub financial_history: u8,
    pub crop_diversification: u8,
    pub market_access: u8,
    pub technology_adoption: u8,
    pub insurance_coverage: u8,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            farm_size: 20,
            experience: 15,
            financial_history: 25,
            crop_diversification: 10,
            market_access: 15,
            technology_adoption: 10,
            insurance_coverage: 5,
        }
    }
}

impl FactorWeights {
    pub const fn weight(&self, kind: FactorKind) -> u8 {
        match kind {
            FactorKind::FarmSize => self.farm_size,
            FactorKind::Experience => self.experience,
            FactorKind::FinancialHistory => self.financial_history,
            FactorKind::CropDiversification => self.crop_diversification,
            FactorKind::MarketAccess => self.market_access,
            FactorKind::TechnologyAdoption => self.technology_adoption,
            FactorKind::InsuranceCoverage => self.insurance_coverage,
        }
    }

    pub fn total(&self) -> u32 {
        FactorKind::ALL
            .iter()
            .map(|kind| u32::from(self.weight(*kind)))
            .sum()
    }

    /// Factors by weight, heaviest first; equal weights keep declaration order.
    pub fn ranked(&self) -> Vec<(FactorKind, u8)> {
        let mut ranked: Vec<_> = FactorKind::ALL
            .iter()
            .map(|kind| (*kind, self.weight(*kind)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Values at which continuous inputs reach the full factor score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaturationPoints {
    pub farm_size_hectares: f64,
    pub experience_years: f64,
    pub crop_count: u32,
}

impl Default for SaturationPoints {
    fn default() -> Self {
        Self {
            farm_size_hectares: 50.0,
            experience_years: 15.0,
            crop_count: 5,
        }
    }
}

/// Inclusive lower bounds of the three upper tiers; anything below is high risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub low_risk: f64,
    pub medium_risk: f64,
    pub moderate_risk: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_risk: 80.0,
            medium_risk: 65.0,
            moderate_risk: 50.0,
        }
    }
}

/// Percentage points added to a product's base rate, per tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateAdjustments {
    pub low_risk: f64,
    pub medium_risk: f64,
    pub moderate_risk: f64,
    pub high_risk: f64,
}

impl Default for RateAdjustments {
    fn default() -> Self {
        Self {
            low_risk: -1.5,
            medium_risk: 0.0,
            moderate_risk: 1.5,
            high_risk: 3.5,
        }
    }
}

impl RateAdjustments {
    pub const fn for_category(&self, category: RiskCategory) -> f64 {
        match category {
            RiskCategory::LowRisk => self.low_risk,
            RiskCategory::MediumRisk => self.medium_risk,
            RiskCategory::ModerateRisk => self.moderate_risk,
            RiskCategory::HighRisk => self.high_risk,
        }
    }
}

/// Failure to load a policy document.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("unable to read scoring policy: {0}")]
    Io(#[from] std::io::Error),
    #[error("scoring policy is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scoring policy rejected: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Public projection of a risk tier for UIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskTierView {
    pub category: RiskCategory,
    pub label: &'static str,
    pub color: &'static str,
    pub min_score: f64,
    pub max_score: f64,
    pub interest_rate_adjustment_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorWeightView {
    pub factor: FactorKind,
    pub label: &'static str,
    pub weight: u8,
}

/// Public projection of the whole policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyView {
    pub factors: Vec<FactorWeightView>,
    pub risk_tiers: Vec<RiskTierView>,
    pub minimum_approval_score: f64,
    pub recommendation_threshold: f64,
    pub loan_amount_per_hectare: f64,
}
