use agri_credit::assessment::{
    LoanProduct, LoanProductConstraints, LoanProductId, LoanProductRegistry, RegistryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) const DEFAULT_PRODUCT: &str = "seasonal-crop-loan";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fixed loan catalog served until the marketplace catalog is wired in.
#[derive(Debug, Clone)]
pub(crate) struct InMemoryLoanProductRegistry {
    products: BTreeMap<LoanProductId, LoanProduct>,
}

impl InMemoryLoanProductRegistry {
    pub(crate) fn new(products: impl IntoIterator<Item = LoanProduct>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|product| (product.id.clone(), product))
                .collect(),
        }
    }

    pub(crate) fn standard() -> Self {
        Self::new(standard_catalog())
    }
}

impl LoanProductRegistry for InMemoryLoanProductRegistry {
    fn constraints(&self, id: &LoanProductId) -> Result<LoanProductConstraints, RegistryError> {
        self.products
            .get(id)
            .map(|product| product.constraints.clone())
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    fn products(&self) -> Result<Vec<LoanProduct>, RegistryError> {
        Ok(self.products.values().cloned().collect())
    }
}

pub(crate) fn standard_catalog() -> Vec<LoanProduct> {
    vec![
        LoanProduct {
            id: LoanProductId::new(DEFAULT_PRODUCT),
            name: "Seasonal crop input loan".to_string(),
            constraints: LoanProductConstraints {
                min_amount: 5_000.0,
                max_amount: 500_000.0,
                base_interest_rate: 12.0,
                min_farm_size: 1.0,
                max_farm_size: 1_000.0,
                min_experience_years: 1.0,
            },
        },
        LoanProduct {
            id: LoanProductId::new("equipment-finance"),
            name: "Farm equipment finance".to_string(),
            constraints: LoanProductConstraints {
                min_amount: 20_000.0,
                max_amount: 2_000_000.0,
                base_interest_rate: 10.5,
                min_farm_size: 5.0,
                max_farm_size: 5_000.0,
                min_experience_years: 3.0,
            },
        },
        LoanProduct {
            id: LoanProductId::new("smallholder-starter"),
            name: "Smallholder starter loan".to_string(),
            constraints: LoanProductConstraints {
                min_amount: 1_000.0,
                max_amount: 25_000.0,
                base_interest_rate: 9.5,
                min_farm_size: 0.5,
                max_farm_size: 10.0,
                min_experience_years: 0.0,
            },
        },
    ]
}
