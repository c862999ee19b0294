use serde::{Deserialize, Serialize};

use super::super::domain::{AssessmentInput, LoanProductConstraints, RiskCategory};
use super::config::ScoringPolicy;

/// Loan eligibility decision for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eligibility {
    pub approved: bool,
    pub max_loan_amount: f64,
    pub interest_rate_adjustment_percent: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decline_reasons: Vec<DeclineReason>,
}

impl Eligibility {
    pub fn summary(&self) -> String {
        if self.approved {
            return format!(
                "approved up to {:.2} (rate adjustment {:+.1} pts)",
                self.max_loan_amount, self.interest_rate_adjustment_percent
            );
        }

        let reasons: Vec<String> = self
            .decline_reasons
            .iter()
            .map(DeclineReason::summary)
            .collect();
        if reasons.is_empty() {
            "declined".to_string()
        } else {
            format!("declined: {}", reasons.join("; "))
        }
    }
}

/// Gates that failed, kept so a decline can be explained to the applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum DeclineReason {
    FarmBelowMinimum { required: f64, actual: f64 },
    FarmAboveMaximum { allowed: f64, actual: f64 },
    InsufficientExperience { required: f64, actual: f64 },
    ScoreBelowThreshold { required: f64, actual: f64 },
}

impl DeclineReason {
    pub fn summary(&self) -> String {
        match self {
            DeclineReason::FarmBelowMinimum { required, actual } => {
                format!("farm size {actual} ha below product minimum {required} ha")
            }
            DeclineReason::FarmAboveMaximum { allowed, actual } => {
                format!("farm size {actual} ha above product maximum {allowed} ha")
            }
            DeclineReason::InsufficientExperience { required, actual } => {
                format!("{actual} years of experience, product requires {required}")
            }
            DeclineReason::ScoreBelowThreshold { required, actual } => {
                format!("credit score {actual:.1} below minimum {required}")
            }
        }
    }
}

pub(crate) fn decide_eligibility(
    total_score: f64,
    risk_category: RiskCategory,
    input: &AssessmentInput,
    constraints: &LoanProductConstraints,
    policy: &ScoringPolicy,
) -> Eligibility {
    let interest_rate_adjustment_percent = policy.rate_adjustments.for_category(risk_category);
    let decline_reasons = failed_gates(total_score, risk_category, input, constraints, policy);

    if !decline_reasons.is_empty() {
        return Eligibility {
            approved: false,
            max_loan_amount: 0.0,
            interest_rate_adjustment_percent,
            decline_reasons,
        };
    }

    Eligibility {
        approved: true,
        max_loan_amount: max_loan_amount(total_score, input, constraints, policy),
        interest_rate_adjustment_percent,
        decline_reasons,
    }
}

fn failed_gates(
    total_score: f64,
    risk_category: RiskCategory,
    input: &AssessmentInput,
    constraints: &LoanProductConstraints,
    policy: &ScoringPolicy,
) -> Vec<DeclineReason> {
    let mut reasons = Vec::new();

    if input.farm_size_hectares < constraints.min_farm_size {
        reasons.push(DeclineReason::FarmBelowMinimum {
            required: constraints.min_farm_size,
            actual: input.farm_size_hectares,
        });
    }
    if input.farm_size_hectares > constraints.max_farm_size {
        reasons.push(DeclineReason::FarmAboveMaximum {
            allowed: constraints.max_farm_size,
            actual: input.farm_size_hectares,
        });
    }
    if input.experience_years < constraints.min_experience_years {
        reasons.push(DeclineReason::InsufficientExperience {
            required: constraints.min_experience_years,
            actual: input.experience_years,
        });
    }
    // HighRisk never passes, even when the approval floor sits inside that tier
    let floor = policy
        .minimum_approval_score
        .max(policy.risk_thresholds.moderate_risk);
    if risk_category == RiskCategory::HighRisk || total_score.is_nan() || total_score < floor {
        reasons.push(DeclineReason::ScoreBelowThreshold {
            required: floor,
            actual: total_score,
        });
    }

    reasons
}

/// Farm scale times creditworthiness, clamped into the product's amount range.
fn max_loan_amount(
    total_score: f64,
    input: &AssessmentInput,
    constraints: &LoanProductConstraints,
    policy: &ScoringPolicy,
) -> f64 {
    let capacity = input.farm_size_hectares * policy.loan_amount_per_hectare * total_score / 100.0;
    // max then min: an inverted product range resolves to max_amount instead of panicking
    let clamped = capacity
        .max(constraints.min_amount)
        .min(constraints.max_amount)
        .max(0.0);
    round_to_cents(clamped)
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints() -> LoanProductConstraints {
        LoanProductConstraints {
            min_amount: 10_000.0,
            max_amount: 250_000.0,
            base_interest_rate: 9.5,
            min_farm_size: 2.0,
            max_farm_size: 500.0,
            min_experience_years: 2.0,
        }
    }

    fn input(farm_size_hectares: f64, experience_years: f64) -> AssessmentInput {
        AssessmentInput {
            farm_size_hectares,
            experience_years,
            ..AssessmentInput::default()
        }
    }

    #[test]
    fn amount_scales_with_farm_and_score() {
        let policy = ScoringPolicy::standard();
        let amount = max_loan_amount(70.0, &input(20.0, 5.0), &constraints(), &policy);
        assert_eq!(amount, 70_000.0);
    }

    #[test]
    fn amount_is_clamped_to_product_bounds() {
        let policy = ScoringPolicy::standard();
        assert_eq!(
            max_loan_amount(60.0, &input(2.0, 5.0), &constraints(), &policy),
            10_000.0
        );
        assert_eq!(
            max_loan_amount(95.0, &input(400.0, 5.0), &constraints(), &policy),
            250_000.0
        );
    }

    #[test]
    fn inverted_product_range_does_not_panic() {
        let policy = ScoringPolicy::standard();
        let mut inverted = constraints();
        inverted.min_amount = 50_000.0;
        inverted.max_amount = 20_000.0;

        let amount = max_loan_amount(90.0, &input(100.0, 5.0), &inverted, &policy);
        assert_eq!(amount, 20_000.0);
    }

    #[test]
    fn every_failed_gate_is_reported() {
        let policy = ScoringPolicy::standard();
        let eligibility = decide_eligibility(
            42.0,
            RiskCategory::HighRisk,
            &input(1.0, 0.5),
            &constraints(),
            &policy,
        );

        assert!(!eligibility.approved);
        assert_eq!(eligibility.max_loan_amount, 0.0);
        assert_eq!(eligibility.interest_rate_adjustment_percent, 3.5);
        assert_eq!(
            eligibility.decline_reasons,
            vec![
                DeclineReason::FarmBelowMinimum {
                    required: 2.0,
                    actual: 1.0
                },
                DeclineReason::InsufficientExperience {
                    required: 2.0,
                    actual: 0.5
                },
                DeclineReason::ScoreBelowThreshold {
                    required: 50.0,
                    actual: 42.0
                },
            ]
        );
        assert!(eligibility.summary().starts_with("declined: farm size 1 ha"));
    }

    #[test]
    fn high_risk_is_declined_under_a_lowered_floor() {
        let mut policy = ScoringPolicy::standard();
        policy.minimum_approval_score = 30.0;

        let eligibility = decide_eligibility(
            43.17,
            RiskCategory::HighRisk,
            &input(50.0, 2.0),
            &constraints(),
            &policy,
        );

        assert!(!eligibility.approved);
        assert_eq!(eligibility.max_loan_amount, 0.0);
        assert_eq!(
            eligibility.decline_reasons,
            vec![DeclineReason::ScoreBelowThreshold {
                required: 50.0,
                actual: 43.17
            }]
        );
    }

    #[test]
    fn score_exactly_on_the_floor_passes() {
        let policy = ScoringPolicy::standard();
        let eligibility = decide_eligibility(
            50.0,
            RiskCategory::ModerateRisk,
            &input(10.0, 3.0),
            &constraints(),
            &policy,
        );

        assert!(eligibility.approved);
        assert_eq!(eligibility.max_loan_amount, 25_000.0);
        assert_eq!(eligibility.interest_rate_adjustment_percent, 1.5);
        assert!(eligibility.decline_reasons.is_empty());
    }
}
