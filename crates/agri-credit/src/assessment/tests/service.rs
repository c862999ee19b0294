use std::sync::Arc;

use super::common::*;
use crate::assessment::domain::{LoanProduct, LoanProductId, Questionnaire, RiskCategory};
use crate::assessment::{AssessmentServiceError, CreditAssessmentService, ScoringPolicy};

#[test]
fn assesses_against_the_requested_product() {
    let (service, _registry) = build_service();

    let result = service
        .assess(&request(SEASONAL, &mixed_input()))
        .expect("assessment succeeds");

    assert_eq!(result.risk_category, RiskCategory::MediumRisk);
    assert!(result.eligibility.approved);
    assert!(approx(result.eligibility.max_loan_amount, 190_416.67));
}

#[test]
fn unknown_product_is_reported() {
    let (service, _registry) = build_service();

    let err = service
        .assess(&request("orchard-bridge", &mixed_input()))
        .expect_err("product is not registered");

    match err {
        AssessmentServiceError::ProductNotFound(id) => assert_eq!(id.as_str(), "orchard-bridge"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn validation_runs_before_product_lookup() {
    let (service, _registry) = build_service();
    let mut request = request("orchard-bridge", &mixed_input());
    request.questionnaire.experience_years = None;

    let err = service
        .assess(&request)
        .expect_err("questionnaire is incomplete");

    match err {
        AssessmentServiceError::Validation(validation) => {
            assert_eq!(validation.fields(), vec!["experience_years"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn registry_outage_is_surfaced() {
    let service = CreditAssessmentService::new(
        Arc::new(UnavailableRegistry),
        ScoringPolicy::standard(),
    );

    let err = service
        .assess(&request(SEASONAL, &mixed_input()))
        .expect_err("registry is offline");
    assert!(matches!(err, AssessmentServiceError::RegistryUnavailable(_)));

    let err = service.products().expect_err("registry is offline");
    assert!(matches!(err, AssessmentServiceError::RegistryUnavailable(_)));
}

#[test]
fn products_added_later_become_assessable() {
    let (service, registry) = build_service();
    registry.insert(LoanProduct {
        id: LoanProductId::new("equipment-finance"),
        name: "Equipment finance".to_string(),
        constraints: open_constraints(),
    });

    let products = service.products().expect("catalog lists");
    let ids: Vec<&str> = products.iter().map(|product| product.id.as_str()).collect();
    assert_eq!(ids, vec!["equipment-finance", SEASONAL]);

    let result = service
        .assess(&request("equipment-finance", &blank_input()))
        .expect("assessment succeeds");
    assert!(!result.eligibility.approved);
}

#[test]
fn preview_scores_without_a_product() {
    let (service, _registry) = build_service();

    let profile = service
        .preview(&Questionnaire::from(&fully_equipped_input()))
        .expect("preview succeeds");

    assert_eq!(profile.total_score, 100.0);
    assert_eq!(profile.risk_category, RiskCategory::LowRisk);
    assert!(profile.recommendations.is_empty());
}

#[test]
fn preview_rejects_incomplete_questionnaire() {
    let (service, _registry) = build_service();

    let err = service
        .preview(&Questionnaire::default())
        .expect_err("nothing answered");

    match err {
        AssessmentServiceError::Validation(validation) => {
            assert_eq!(
                validation.fields(),
                vec!["farm_size_hectares", "experience_years"]
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn service_uses_the_configured_policy() {
    let registry = Arc::new(MemoryRegistry::with_seasonal());
    let mut policy = ScoringPolicy::standard();
    policy.minimum_approval_score = 80.0;
    let service = CreditAssessmentService::new(registry, policy);

    assert_eq!(service.policy().minimum_approval_score, 80.0);
    let result = service
        .assess(&request(SEASONAL, &mixed_input()))
        .expect("assessment succeeds");
    assert!(!result.eligibility.approved);
}
