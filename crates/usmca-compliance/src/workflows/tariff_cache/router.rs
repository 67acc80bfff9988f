use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::batch::BatchValidationReport;
use super::domain::TariffCacheRecord;
use super::issues::ValidationResult;
use super::repository::TariffCacheRepository;
use super::service::{IngestMode, TariffCacheService, TariffCacheServiceError};

/// Either one record or a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValidateRequest {
    Batch(Vec<TariffCacheRecord>),
    Single(TariffCacheRecord),
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ValidateResponse {
    Batch(BatchValidationReport),
    Single(ValidationResult),
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct IngestQuery {
    #[serde(default)]
    pub mode: IngestMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavingsQuery {
    #[serde(default)]
    pub annual_import_value: Option<f64>,
    #[serde(default)]
    pub trade_volume: Option<String>,
}

pub fn tariff_cache_router<R>(service: Arc<TariffCacheService<R>>) -> Router
where
    R: TariffCacheRepository + 'static,
{
    Router::new()
        .route("/api/v1/tariff-cache/validate", post(validate_handler::<R>))
        .route("/api/v1/tariff-cache/records", post(ingest_handler::<R>))
        .route("/api/v1/tariff-cache/records/:hs_code", get(lookup_handler::<R>))
        .route(
            "/api/v1/tariff-cache/records/:hs_code/savings",
            get(savings_handler::<R>),
        )
        .route("/api/v1/tariff-cache/health", get(health_handler::<R>))
        .with_state(service)
}

pub(crate) async fn validate_handler<R>(
    State(service): State<Arc<TariffCacheService<R>>>,
    axum::Json(request): axum::Json<ValidateRequest>,
) -> Response
where
    R: TariffCacheRepository + 'static,
{
    let validator = service.validator();
    let response = match request {
        ValidateRequest::Single(record) => {
            ValidateResponse::Single(validator.validate_record(&record))
        }
        ValidateRequest::Batch(records) => {
            ValidateResponse::Batch(validator.validate_batch(&records))
        }
    };
    (StatusCode::OK, axum::Json(response)).into_response()
}

pub(crate) async fn ingest_handler<R>(
    State(service): State<Arc<TariffCacheService<R>>>,
    Query(query): Query<IngestQuery>,
    axum::Json(records): axum::Json<Vec<TariffCacheRecord>>,
) -> Response
where
    R: TariffCacheRepository + 'static,
{
    match service.ingest(records, query.mode) {
        Ok(summary) if summary.committed => (StatusCode::OK, axum::Json(summary)).into_response(),
        Ok(summary) => (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn lookup_handler<R>(
    State(service): State<Arc<TariffCacheService<R>>>,
    Path(hs_code): Path<String>,
) -> Response
where
    R: TariffCacheRepository + 'static,
{
    match service.lookup(&hs_code) {
        Ok(lookup) => (StatusCode::OK, axum::Json(lookup)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn savings_handler<R>(
    State(service): State<Arc<TariffCacheService<R>>>,
    Path(hs_code): Path<String>,
    Query(query): Query<SavingsQuery>,
) -> Response
where
    R: TariffCacheRepository + 'static,
{
    let annual_import_value = match (query.annual_import_value, query.trade_volume.as_deref()) {
        (Some(value), _) => value,
        (None, Some(raw)) => service.estimator().trade_volume(raw),
        (None, None) => {
            let payload = json!({
                "error": "annual_import_value or trade_volume is required",
                "kind": "invalid_input",
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.estimate_savings(&hs_code, annual_import_value) {
        Ok(estimate) => (StatusCode::OK, axum::Json(estimate)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn health_handler<R>(State(service): State<Arc<TariffCacheService<R>>>) -> Response
where
    R: TariffCacheRepository + 'static,
{
    match service.health() {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TariffCacheServiceError) -> Response {
    let (status, kind) = match &error {
        TariffCacheServiceError::InvalidHsCode(_) | TariffCacheServiceError::Savings(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input")
        }
        TariffCacheServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        TariffCacheServiceError::MissingRate { .. } => (StatusCode::CONFLICT, "missing_rate"),
        TariffCacheServiceError::Repository(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "repository_unavailable")
        }
    };
    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (status, axum::Json(payload)).into_response()
}
