//! Agricultural credit scoring and loan eligibility.
//!
//! A questionnaire is normalized into an `AssessmentInput`, scored factor by
//! factor, aggregated, classified into a risk tier and finally checked against
//! the constraints of the loan product the farmer applied for. Everything after
//! normalization is total: once the input validates, an assessment always
//! completes.

pub mod domain;
pub mod intake;
pub mod registry;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentInput, AssessmentRequest, FactorKind, LoanProduct, LoanProductConstraints,
    LoanProductId, Questionnaire, RiskCategory,
};
pub use intake::{FieldIssue, FieldProblem, QuestionnaireNormalizer, ValidationError};
pub use registry::{LoanProductRegistry, RegistryError};
pub use router::assessment_router;
pub use scoring::{
    AssessmentResult, CreditAssessmentEngine, CreditProfile, DeclineReason, Eligibility,
    FactorScores, PolicyError, PolicyView, RiskTierView, ScoreComponent, ScoringPolicy,
};
pub use service::{AssessmentServiceError, CreditAssessmentService};
