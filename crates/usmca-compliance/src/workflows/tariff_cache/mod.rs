//! Write-time gate and lookup table for cached tariff rates.
//!
//! Sync jobs feed records through [`CacheValidator`] before anything reaches the
//! repository. Errors block insertion, warnings are logged and returned. The health report
//! looks at the cache as a whole for corruption a single record cannot reveal.

pub mod batch;
pub mod domain;
pub mod health;
mod hs_code;
pub mod import;
pub mod issues;
pub mod repository;
pub mod router;
pub mod service;
mod validator;

#[cfg(test)]
mod tests;

pub use batch::{BatchValidationReport, CacheValidationError, FilterOptions, RecordValidation};
pub use domain::{
    parse_verified_date, DeclaredText, RateField, StoredTariffRate, TariffCacheRecord,
};
pub use health::{assess_cache_health, CacheHealthReport, HealthCheck, HealthSeverity, HealthStatus};
pub use hs_code::{normalize_hs_code, parent_codes};
pub use import::{import_records, import_records_from_path, TariffImportError};
pub use issues::{IssueCode, IssueSeverity, ValidationIssue, ValidationResult};
pub use repository::{RepositoryError, TariffCacheRepository};
pub use router::{tariff_cache_router, ValidateRequest, ValidateResponse};
pub use service::{
    HsSavingsEstimate, IngestMode, IngestSummary, MatchType, RateLookup, TariffCacheService,
    TariffCacheServiceError,
};
pub use validator::CacheValidator;
