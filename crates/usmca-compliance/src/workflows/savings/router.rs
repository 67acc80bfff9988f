use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::SavingsEstimator;

/// Either an explicit annual import value or a free-text trade volume must be supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsRequest {
    #[serde(default)]
    pub annual_import_value: Option<f64>,
    #[serde(default)]
    pub trade_volume: Option<String>,
    pub mfn_rate: f64,
    pub usmca_rate: f64,
}

pub fn savings_router(estimator: Arc<SavingsEstimator>) -> Router {
    Router::new()
        .route("/api/v1/savings/estimate", post(estimate_handler))
        .with_state(estimator)
}

pub(crate) async fn estimate_handler(
    State(estimator): State<Arc<SavingsEstimator>>,
    axum::Json(request): axum::Json<SavingsRequest>,
) -> Response {
    let annual_import_value = match (request.annual_import_value, request.trade_volume.as_deref()) {
        (Some(value), _) => value,
        (None, Some(raw)) => estimator.trade_volume(raw),
        (None, None) => {
            let payload = json!({
                "error": "annual_import_value or trade_volume is required",
                "kind": "invalid_input",
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match estimator.estimate(annual_import_value, request.mfn_rate, request.usmca_rate) {
        Ok(estimate) => (StatusCode::OK, axum::Json(estimate)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
                "kind": "invalid_input",
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
