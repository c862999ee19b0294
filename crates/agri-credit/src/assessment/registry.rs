use super::domain::{LoanProduct, LoanProductConstraints, LoanProductId};

/// Read-only access to the loan product catalog.
///
/// Retries and caching belong to implementations; the assessment core only
/// performs one synchronous lookup per request.
pub trait LoanProductRegistry: Send + Sync {
    fn constraints(&self, id: &LoanProductId) -> Result<LoanProductConstraints, RegistryError>;
    fn products(&self) -> Result<Vec<LoanProduct>, RegistryError>;
}

/// Error enumeration for catalog lookups.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("loan product '{0}' not found")]
    NotFound(LoanProductId),
    #[error("loan product registry unavailable: {0}")]
    Unavailable(String),
}
