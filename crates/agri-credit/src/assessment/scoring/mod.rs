mod advice;
mod config;
mod policy;
mod rules;

pub use config::{
    FactorWeightView, FactorWeights, PolicyError, PolicyView, RateAdjustments, RiskThresholds,
    RiskTierView, SaturationPoints, ScoringPolicy,
};
pub use policy::{DeclineReason, Eligibility};

use std::collections::BTreeMap;

use super::domain::{AssessmentInput, FactorKind, LoanProductConstraints, RiskCategory};
use serde::{Deserialize, Serialize};

/// Per-factor scores in `[0, 100]`, keyed by factor.
pub type FactorScores = BTreeMap<FactorKind, f64>;

/// Stateless engine applying a scoring policy to validated input.
///
/// Holds no per-request state, so one instance can sit behind an `Arc` and
/// serve any number of concurrent handlers.
#[derive(Debug, Clone)]
pub struct CreditAssessmentEngine {
    policy: ScoringPolicy,
}

impl Default for CreditAssessmentEngine {
    fn default() -> Self {
        Self::new(ScoringPolicy::standard())
    }
}

impl CreditAssessmentEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score, classify and advise without a loan product in view.
    pub fn profile(&self, input: &AssessmentInput) -> CreditProfile {
        let components = rules::score_factors(input, &self.policy);
        let total_score = rules::aggregate(&components);
        let risk_category = rules::classify(total_score, &self.policy.risk_thresholds);
        let recommendations = advice::recommendations(&components, &self.policy);

        CreditProfile {
            total_score,
            risk_category,
            factor_scores: components
                .iter()
                .map(|component| (component.factor, component.score))
                .collect(),
            recommendations,
            components,
        }
    }

    /// Full pipeline: profile plus the eligibility decision for one product.
    pub fn assess(
        &self,
        input: &AssessmentInput,
        constraints: &LoanProductConstraints,
    ) -> AssessmentResult {
        let profile = self.profile(input);
        let eligibility = policy::decide_eligibility(
            profile.total_score,
            profile.risk_category,
            input,
            constraints,
            &self.policy,
        );

        AssessmentResult {
            total_score: profile.total_score,
            risk_category: profile.risk_category,
            factor_scores: profile.factor_scores,
            recommendations: profile.recommendations,
            eligibility,
            components: profile.components,
        }
    }
}

/// Discrete contribution of one factor, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: FactorKind,
    pub score: f64,
    pub weight: u8,
    pub weighted: f64,
    pub notes: String,
}

/// Product-independent part of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditProfile {
    pub total_score: f64,
    pub risk_category: RiskCategory,
    pub factor_scores: FactorScores,
    pub recommendations: Vec<String>,
    pub components: Vec<ScoreComponent>,
}

/// Assessment output returned to the loan application workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub total_score: f64,
    pub risk_category: RiskCategory,
    pub factor_scores: FactorScores,
    pub recommendations: Vec<String>,
    pub eligibility: Eligibility,
    pub components: Vec<ScoreComponent>,
}

impl AssessmentResult {
    pub fn factor_score(&self, kind: FactorKind) -> f64 {
        self.factor_scores.get(&kind).copied().unwrap_or(0.0)
    }
}
