use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{AssessmentRequest, LoanProduct, LoanProductId, Questionnaire};
use super::intake::{QuestionnaireNormalizer, ValidationError};
use super::registry::{LoanProductRegistry, RegistryError};
use super::scoring::{AssessmentResult, CreditAssessmentEngine, CreditProfile, ScoringPolicy};

/// Service composing the questionnaire normalizer, product registry and engine.
pub struct CreditAssessmentService<R> {
    normalizer: QuestionnaireNormalizer,
    registry: Arc<R>,
    engine: Arc<CreditAssessmentEngine>,
}

impl<R> CreditAssessmentService<R>
where
    R: LoanProductRegistry + 'static,
{
    pub fn new(registry: Arc<R>, policy: ScoringPolicy) -> Self {
        Self {
            normalizer: QuestionnaireNormalizer,
            registry,
            engine: Arc::new(CreditAssessmentEngine::new(policy)),
        }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        self.engine.policy()
    }

    /// Validate the questionnaire, resolve the product, then run the full pipeline.
    ///
    /// Validation runs before the lookup so an applicant is re-prompted for
    /// bad answers even when the product id is also wrong.
    pub fn assess(
        &self,
        request: &AssessmentRequest,
    ) -> Result<AssessmentResult, AssessmentServiceError> {
        let input = self.normalizer.normalize(&request.questionnaire).map_err(|err| {
            debug!(product = %request.product_id, fields = ?err.fields(), "questionnaire rejected");
            err
        })?;

        let constraints = match self.registry.constraints(&request.product_id) {
            Ok(constraints) => constraints,
            Err(err) => {
                warn!(product = %request.product_id, error = %err, "loan product lookup failed");
                return Err(err.into());
            }
        };

        let result = self.engine.assess(&input, &constraints);
        info!(
            product = %request.product_id,
            total_score = result.total_score,
            risk = result.risk_category.label(),
            approved = result.eligibility.approved,
            "credit assessment completed"
        );

        Ok(result)
    }

    /// Score a questionnaire without an eligibility decision.
    pub fn preview(
        &self,
        questionnaire: &Questionnaire,
    ) -> Result<CreditProfile, AssessmentServiceError> {
        let input = self.normalizer.normalize(questionnaire)?;
        Ok(self.engine.profile(&input))
    }

    pub fn products(&self) -> Result<Vec<LoanProduct>, AssessmentServiceError> {
        Ok(self.registry.products()?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("loan product '{0}' not found")]
    ProductNotFound(LoanProductId),
    #[error("loan product registry unavailable: {0}")]
    RegistryUnavailable(String),
}

impl From<RegistryError> for AssessmentServiceError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::NotFound(id) => Self::ProductNotFound(id),
            RegistryError::Unavailable(reason) => Self::RegistryUnavailable(reason),
        }
    }
}
