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

use super::domain::{ComponentSubmission, QualificationResult};
use super::evaluation::QualificationEvaluator;
use super::report::QualificationReport;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationRequest {
    #[serde(default)]
    pub product: Option<String>,
    pub business_type: String,
    pub components: Vec<ComponentSubmission>,
    #[serde(default)]
    pub include_report: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualificationResponse {
    pub result: QualificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<QualificationReport>,
}

/// Router exposing the RVC evaluator over HTTP.
pub fn qualification_router(evaluator: Arc<QualificationEvaluator>) -> Router {
    Router::new()
        .route("/api/v1/qualification/evaluate", post(evaluate_handler))
        .with_state(evaluator)
}

pub(crate) async fn evaluate_handler(
    State(evaluator): State<Arc<QualificationEvaluator>>,
    axum::Json(request): axum::Json<QualificationRequest>,
) -> Response {
    let QualificationRequest {
        product,
        business_type,
        components,
        include_report,
    } = request;

    match evaluator.evaluate_submissions(components, &business_type) {
        Ok(result) => {
            let report = include_report.then(|| {
                QualificationReport::build(product.as_deref().unwrap_or("Unnamed product"), &result)
            });
            (
                StatusCode::OK,
                axum::Json(QualificationResponse { result, report }),
            )
                .into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
                "kind": "invalid_input",
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
