use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryTariffCacheRepository};
use crate::routes::{with_service_routes, Services};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use usmca_compliance::config::AppConfig;
use usmca_compliance::error::AppError;
use usmca_compliance::telemetry;
use usmca_compliance::workflows::qualification::QualificationEvaluator;
use usmca_compliance::workflows::savings::SavingsEstimator;
use usmca_compliance::workflows::tariff_cache::TariffCacheService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let estimator = SavingsEstimator::new(config.savings);
    let repository = Arc::new(InMemoryTariffCacheRepository::default());
    let services = Services {
        qualification: Arc::new(QualificationEvaluator::new(config.qualification.clone())),
        savings: Arc::new(estimator),
        tariff_cache: Arc::new(TariffCacheService::new(
            repository,
            config.tariff_cache,
            estimator,
        )),
    };

    let app = with_service_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_threshold = config.qualification.thresholds.default_threshold(),
        freshness_window_days = config.tariff_cache.freshness_window_days,
        "usmca compliance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
