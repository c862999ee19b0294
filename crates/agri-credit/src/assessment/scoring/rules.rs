use super::super::domain::{AssessmentInput, FactorKind, RiskCategory};
use super::config::{RiskThresholds, ScoringPolicy};
use super::ScoreComponent;

/// Score all seven factors in declaration order.
pub(crate) fn score_factors(input: &AssessmentInput, policy: &ScoringPolicy) -> Vec<ScoreComponent> {
    FactorKind::ALL
        .iter()
        .map(|kind| {
            let (score, notes) = score_factor(*kind, input, policy);
            let weight = policy.weights.weight(*kind);
            ScoreComponent {
                factor: *kind,
                score,
                weight,
                weighted: score * f64::from(weight) / 100.0,
                notes,
            }
        })
        .collect()
}

fn score_factor(kind: FactorKind, input: &AssessmentInput, policy: &ScoringPolicy) -> (f64, String) {
    let saturation = &policy.saturation;
    match kind {
        FactorKind::FarmSize => (
            saturating_score(input.farm_size_hectares, saturation.farm_size_hectares),
            format!(
                "{} ha cultivated (full credit from {} ha)",
                input.farm_size_hectares, saturation.farm_size_hectares
            ),
        ),
        FactorKind::Experience => (
            saturating_score(input.experience_years, saturation.experience_years),
            format!(
                "{} years farming (full credit from {} years)",
                input.experience_years, saturation.experience_years
            ),
        ),
        FactorKind::FinancialHistory => {
            flag_share(&input.financial_history_flags(), "financial records provided")
        }
        FactorKind::CropDiversification => (
            saturating_score(f64::from(input.crop_count), f64::from(saturation.crop_count)),
            format!(
                "{} crop type(s) cultivated (full credit from {})",
                input.crop_count, saturation.crop_count
            ),
        ),
        FactorKind::MarketAccess => {
            flag_share(&input.market_access_flags(), "market access channels in place")
        }
        FactorKind::TechnologyAdoption => {
            flag_share(&input.technology_flags(), "technology practices adopted")
        }
        FactorKind::InsuranceCoverage => {
            flag_share(&input.insurance_flags(), "insurance policies held")
        }
    }
}

fn saturating_score(value: f64, saturation: f64) -> f64 {
    if saturation <= 0.0 {
        return 100.0;
    }
    clamp_score(value / saturation * 100.0)
}

fn flag_share(flags: &[bool], description: &str) -> (f64, String) {
    let held = flags.iter().filter(|flag| **flag).count();
    let total = flags.len();
    let score = if total == 0 {
        0.0
    } else {
        held as f64 / total as f64 * 100.0
    };
    (
        clamp_score(score),
        format!("{held} of {total} {description}"),
    )
}

pub(crate) fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Weighted sum of factor scores, normalised by the weight total of 100.
pub(crate) fn aggregate(components: &[ScoreComponent]) -> f64 {
    let weighted: f64 = components
        .iter()
        .map(|component| component.score * f64::from(component.weight))
        .sum();
    clamp_score(weighted / 100.0)
}

/// Lower bounds are inclusive, so a score exactly on a threshold takes the better tier.
pub(crate) fn classify(total_score: f64, thresholds: &RiskThresholds) -> RiskCategory {
    match total_score {
        score if score >= thresholds.low_risk => RiskCategory::LowRisk,
        score if score >= thresholds.medium_risk => RiskCategory::MediumRisk,
        score if score >= thresholds.moderate_risk => RiskCategory::ModerateRisk,
        _ => RiskCategory::HighRisk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_score_caps_at_full_credit() {
        assert_eq!(saturating_score(25.0, 50.0), 50.0);
        assert_eq!(saturating_score(50.0, 50.0), 100.0);
        assert_eq!(saturating_score(500.0, 50.0), 100.0);
        assert_eq!(saturating_score(0.0, 50.0), 0.0);
    }

    #[test]
    fn flag_share_counts_true_answers() {
        let (score, notes) = flag_share(&[true, false, true, false], "records");
        assert_eq!(score, 50.0);
        assert_eq!(notes, "2 of 4 records");
    }

    #[test]
    fn classify_respects_closed_lower_bounds() {
        let thresholds = RiskThresholds::default();
        assert_eq!(classify(100.0, &thresholds), RiskCategory::LowRisk);
        assert_eq!(classify(80.0, &thresholds), RiskCategory::LowRisk);
        assert_eq!(classify(79.99, &thresholds), RiskCategory::MediumRisk);
        assert_eq!(classify(65.0, &thresholds), RiskCategory::MediumRisk);
        assert_eq!(classify(64.99, &thresholds), RiskCategory::ModerateRisk);
        assert_eq!(classify(50.0, &thresholds), RiskCategory::ModerateRisk);
        assert_eq!(classify(49.99, &thresholds), RiskCategory::HighRisk);
        assert_eq!(classify(0.0, &thresholds), RiskCategory::HighRisk);
    }

    #[test]
    fn every_score_maps_to_exactly_one_tier() {
        let thresholds = RiskThresholds::default();
        for hundredths in 0..=10_000 {
            let score = f64::from(hundredths) / 100.0;
            let expected = if score >= 80.0 {
                RiskCategory::LowRisk
            } else if score >= 65.0 {
                RiskCategory::MediumRisk
            } else if score >= 50.0 {
                RiskCategory::ModerateRisk
            } else {
                RiskCategory::HighRisk
            };
            assert_eq!(classify(score, &thresholds), expected, "score {score}");
        }
    }

    #[test]
    fn clamp_score_maps_nan_to_zero() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(-4.0), 0.0);
        assert_eq!(clamp_score(140.0), 100.0);
    }
}
