use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::qualification::InvalidInputError;
use crate::workflows::savings::SavingsError;
use crate::workflows::tariff_cache::{
    CacheValidationError, RepositoryError, TariffCacheServiceError, TariffImportError,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(TariffImportError),
    Qualification(InvalidInputError),
    Savings(SavingsError),
    CacheValidation(CacheValidationError),
    TariffCache(TariffCacheServiceError),
    Repository(RepositoryError),
    Usage(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Qualification(err) => write!(f, "invalid qualification input: {}", err),
            AppError::Savings(err) => write!(f, "invalid savings input: {}", err),
            AppError::CacheValidation(err) => write!(f, "tariff cache rejected: {}", err),
            AppError::TariffCache(err) => write!(f, "tariff cache error: {}", err),
            AppError::Repository(err) => write!(f, "repository error: {}", err),
            AppError::Usage(message) => write!(f, "usage error: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Qualification(err) => Some(err),
            AppError::Savings(err) => Some(err),
            AppError::CacheValidation(err) => Some(err),
            AppError::TariffCache(err) => Some(err),
            AppError::Repository(err) => Some(err),
            AppError::Usage(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Qualification(_)
            | AppError::Savings(_)
            | AppError::CacheValidation(_)
            | AppError::Import(_)
            | AppError::Usage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TariffCache(TariffCacheServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Repository(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::TariffCache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<TariffImportError> for AppError {
    fn from(value: TariffImportError) -> Self {
        Self::Import(value)
    }
}

impl From<InvalidInputError> for AppError {
    fn from(value: InvalidInputError) -> Self {
        Self::Qualification(value)
    }
}

impl From<SavingsError> for AppError {
    fn from(value: SavingsError) -> Self {
        Self::Savings(value)
    }
}

impl From<CacheValidationError> for AppError {
    fn from(value: CacheValidationError) -> Self {
        Self::CacheValidation(value)
    }
}

impl From<TariffCacheServiceError> for AppError {
    fn from(value: TariffCacheServiceError) -> Self {
        Self::TariffCache(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}
