use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::TariffCacheConfig;
use crate::workflows::savings::{SavingsError, SavingsEstimate, SavingsEstimator};

use super::batch::BatchValidationReport;
use super::domain::{StoredTariffRate, TariffCacheRecord};
use super::health::{assess_cache_health, CacheHealthReport};
use super::hs_code::{normalize_hs_code, parent_codes};
use super::repository::{RepositoryError, TariffCacheRepository};
use super::validator::CacheValidator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestMode {
    /// Refuse the whole batch if any record fails.
    #[default]
    AllOrNothing,
    /// Insert passing records and report the rest.
    SkipInvalid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub mode: IngestMode,
    pub committed: bool,
    pub inserted: usize,
    pub rejected: usize,
    pub validation: BatchValidationReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    #[serde(rename = "parent_8")]
    Parent8,
    #[serde(rename = "parent_6")]
    Parent6,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLookup {
    pub requested: String,
    pub matched_hs_code: String,
    pub match_type: MatchType,
    pub rate: StoredTariffRate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsSavingsEstimate {
    pub lookup: RateLookup,
    pub estimate: SavingsEstimate,
}

#[derive(Debug, thiserror::Error)]
pub enum TariffCacheServiceError {
    #[error("hs code '{0}' cannot be normalized to 6 or 8 digits")]
    InvalidHsCode(String),
    #[error("no cached rate for hs code {0}")]
    NotFound(String),
    #[error("cached rate for {hs_code} has no {field}")]
    MissingRate { hs_code: String, field: &'static str },
    #[error(transparent)]
    Savings(#[from] SavingsError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Gated ingest plus read access to the rate lookup table.
pub struct TariffCacheService<R> {
    validator: CacheValidator,
    estimator: SavingsEstimator,
    config: TariffCacheConfig,
    repository: Arc<R>,
}

impl<R> TariffCacheService<R>
where
    R: TariffCacheRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        config: TariffCacheConfig,
        estimator: SavingsEstimator,
    ) -> Self {
        Self {
            validator: CacheValidator::new(config),
            estimator,
            config,
            repository,
        }
    }

    /// Pin the validator's notion of today.
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.validator = self.validator.as_of(today);
        self
    }

    pub fn validator(&self) -> &CacheValidator {
        &self.validator
    }

    pub fn estimator(&self) -> &SavingsEstimator {
        &self.estimator
    }

    pub fn ingest(
        &self,
        records: Vec<TariffCacheRecord>,
        mode: IngestMode,
    ) -> Result<IngestSummary, TariffCacheServiceError> {
        let validation = self.validator.validate_batch(&records);

        if mode == IngestMode::AllOrNothing && !validation.all_valid() {
            warn!(
                invalid = validation.invalid_count,
                total = records.len(),
                "rejecting tariff cache batch"
            );
            return Ok(IngestSummary {
                mode,
                committed: false,
                inserted: 0,
                rejected: records.len(),
                validation,
            });
        }

        let rates: Vec<StoredTariffRate> = records
            .iter()
            .zip(&validation.results)
            .filter(|(_, entry)| entry.result.valid)
            .filter_map(|(record, _)| StoredTariffRate::from_validated(record))
            .collect();

        let inserted = self.repository.upsert_all(rates)?;
        info!(
            inserted,
            rejected = records.len() - inserted,
            warnings = validation.warning_count,
            ?mode,
            "ingested tariff cache records"
        );

        Ok(IngestSummary {
            mode,
            committed: true,
            inserted,
            rejected: records.len() - inserted,
            validation,
        })
    }

    /// Exact match first, then the 8-digit and 6-digit parents.
    pub fn lookup(&self, hs_code: &str) -> Result<RateLookup, TariffCacheServiceError> {
        let digits: String = hs_code.chars().filter(|c| c.is_ascii_digit()).collect();
        if normalize_hs_code(&digits).is_none() {
            return Err(TariffCacheServiceError::InvalidHsCode(hs_code.to_string()));
        }

        let candidates = std::iter::once((digits.clone(), MatchType::Exact)).chain(
            parent_codes(&digits).into_iter().map(|code| {
                let match_type = if code.len() == 8 {
                    MatchType::Parent8
                } else {
                    MatchType::Parent6
                };
                (code, match_type)
            }),
        );

        for (code, match_type) in candidates {
            if let Some(rate) = self.repository.fetch(&code)? {
                debug!(requested = hs_code, matched = %code, ?match_type, "tariff rate lookup");
                return Ok(RateLookup {
                    requested: hs_code.to_string(),
                    matched_hs_code: code,
                    match_type,
                    rate,
                });
            }
        }

        Err(TariffCacheServiceError::NotFound(hs_code.to_string()))
    }

    /// Savings for an HS code using its cached MFN rate. A missing USMCA rate counts as duty-free.
    pub fn estimate_savings(
        &self,
        hs_code: &str,
        annual_import_value: f64,
    ) -> Result<HsSavingsEstimate, TariffCacheServiceError> {
        let lookup = self.lookup(hs_code)?;
        let mfn_rate = lookup
            .rate
            .mfn_rate
            .ok_or_else(|| TariffCacheServiceError::MissingRate {
                hs_code: lookup.matched_hs_code.clone(),
                field: "mfn_rate",
            })?;
        let usmca_rate = lookup.rate.usmca_rate.unwrap_or(0.0);

        let estimate = self
            .estimator
            .estimate(annual_import_value, mfn_rate, usmca_rate)?;
        Ok(HsSavingsEstimate { lookup, estimate })
    }

    pub fn health(&self) -> Result<CacheHealthReport, TariffCacheServiceError> {
        let records: Vec<TariffCacheRecord> = self
            .repository
            .all()?
            .iter()
            .map(TariffCacheRecord::from)
            .collect();
        Ok(assess_cache_health(
            &records,
            self.validator.today(),
            &self.config,
        ))
    }
}
