use super::config::ScoringPolicy;
use super::ScoreComponent;

/// One suggestion per weak factor, most financially material first.
pub(crate) fn recommendations(components: &[ScoreComponent], policy: &ScoringPolicy) -> Vec<String> {
    policy
        .weights
        .ranked()
        .into_iter()
        .filter_map(|(kind, _)| {
            components
                .iter()
                .find(|component| component.factor == kind)
                .filter(|component| component.score < policy.recommendation_threshold)
                .map(|_| policy.recommendation_for(kind).to_string())
        })
        .collect()
}
