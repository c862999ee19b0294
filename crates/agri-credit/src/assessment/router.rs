use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};

use super::domain::{AssessmentRequest, LoanProduct, Questionnaire};
use super::registry::LoanProductRegistry;
use super::scoring::{AssessmentResult, CreditProfile, PolicyView};
use super::service::CreditAssessmentService;
use crate::error::AppError;

/// Router builder exposing the assessment endpoints.
pub fn assessment_router<R>(service: Arc<CreditAssessmentService<R>>) -> Router
where
    R: LoanProductRegistry + 'static,
{
    Router::new()
        .route("/api/v1/credit/assessments", post(assess_handler::<R>))
        .route(
            "/api/v1/credit/assessments/preview",
            post(preview_handler::<R>),
        )
        .route("/api/v1/credit/products", get(products_handler::<R>))
        .route("/api/v1/credit/policy", get(policy_handler::<R>))
        .with_state(service)
}

pub(crate) async fn assess_handler<R>(
    State(service): State<Arc<CreditAssessmentService<R>>>,
    payload: Result<Json<AssessmentRequest>, JsonRejection>,
) -> Result<Json<AssessmentResult>, AppError>
where
    R: LoanProductRegistry + 'static,
{
    let Json(request) = payload?;
    let result = service.assess(&request)?;
    Ok(Json(result))
}

pub(crate) async fn preview_handler<R>(
    State(service): State<Arc<CreditAssessmentService<R>>>,
    payload: Result<Json<Questionnaire>, JsonRejection>,
) -> Result<Json<CreditProfile>, AppError>
where
    R: LoanProductRegistry + 'static,
{
    let Json(questionnaire) = payload?;
    let profile = service.preview(&questionnaire)?;
    Ok(Json(profile))
}

pub(crate) async fn products_handler<R>(
    State(service): State<Arc<CreditAssessmentService<R>>>,
) -> Result<Json<Vec<LoanProduct>>, AppError>
where
    R: LoanProductRegistry + 'static,
{
    let products = service.products()?;
    Ok(Json(products))
}

pub(crate) async fn policy_handler<R>(
    State(service): State<Arc<CreditAssessmentService<R>>>,
) -> Json<PolicyView>
where
    R: LoanProductRegistry + 'static,
{
    Json(service.policy().view())
}
