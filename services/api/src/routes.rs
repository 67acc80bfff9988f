use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use usmca_compliance::workflows::qualification::{qualification_router, QualificationEvaluator};
use usmca_compliance::workflows::savings::{savings_router, SavingsEstimator};
use usmca_compliance::workflows::tariff_cache::{
    tariff_cache_router, TariffCacheRepository, TariffCacheService,
};

/// Domain services mounted by the HTTP server.
pub(crate) struct Services<R> {
    pub(crate) qualification: Arc<QualificationEvaluator>,
    pub(crate) savings: Arc<SavingsEstimator>,
    pub(crate) tariff_cache: Arc<TariffCacheService<R>>,
}

pub(crate) fn with_service_routes<R>(services: Services<R>) -> Router
where
    R: TariffCacheRepository + 'static,
{
    qualification_router(services.qualification)
        .merge(savings_router(services.savings))
        .merge(tariff_cache_router(services.tariff_cache))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryTariffCacheRepository;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;
    use usmca_compliance::config::TariffCacheConfig;

    fn app(ready: bool) -> Router {
        let estimator = SavingsEstimator::default();
        let services = Services {
            qualification: Arc::new(QualificationEvaluator::default()),
            savings: Arc::new(estimator),
            tariff_cache: Arc::new(TariffCacheService::new(
                Arc::new(InMemoryTariffCacheRepository::default()),
                TariffCacheConfig::default(),
                estimator,
            )),
        };
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(services).layer(Extension(state))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn qualification_route_is_mounted() {
        let body = json!({
            "business_type": "electronics",
            "components": [
                { "description": "Panel", "origin_country": "TW", "value_percentage": 45 },
                { "description": "Enclosure", "origin_country": "MX", "value_percentage": 30 },
                { "description": "Assembly", "origin_country": "CA", "value_percentage": 25 }
            ]
        });
        let response = app(true)
            .oneshot(
                Request::post("/api/v1/qualification/evaluate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = json_body(response).await;
        assert_eq!(payload["result"]["qualified"], json!(false));
        assert_eq!(payload["result"]["margin"], json!(-10.0));
    }

    #[tokio::test]
    async fn savings_and_cache_routes_are_mounted() {
        let router = app(true);
        let body = json!({ "annual_import_value": 10_000_000.0, "mfn_rate": 0.25, "usmca_rate": 0.0 });
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/v1/savings/estimate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        let payload = json_body(response).await;
        assert_eq!(payload["annual_savings"], json!(2_500_000.0));

        let response = router
            .oneshot(
                Request::get("/api/v1/tariff-cache/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["total_records"], json!(0));
    }

    #[tokio::test]
    async fn healthcheck_is_static() {
        let response = app(false)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }
}
