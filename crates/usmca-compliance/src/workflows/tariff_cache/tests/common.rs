use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::TariffCacheConfig;
use crate::workflows::savings::SavingsEstimator;
use crate::workflows::tariff_cache::{
    CacheValidator, RateField, RepositoryError, StoredTariffRate, TariffCacheRecord,
    TariffCacheRepository, TariffCacheService,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 20).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    today() - chrono::Duration::days(days)
}

pub(super) fn validator() -> CacheValidator {
    CacheValidator::default().as_of(today())
}

/// A record that passes the gate with no warnings.
pub(super) fn clean_record(hs_code: &str) -> TariffCacheRecord {
    TariffCacheRecord::new(hs_code)
        .with_rate(RateField::MfnRate, 0.029)
        .with_rate(RateField::Section232, 0.25)
        .with_source("HTS 2025 Revision 3")
        .verified_on(days_ago(3))
        .with_confidence(95.0)
}

#[derive(Default)]
pub(super) struct InMemoryRepository {
    rates: Mutex<BTreeMap<String, StoredTariffRate>>,
}

impl TariffCacheRepository for InMemoryRepository {
    fn upsert(&self, rate: StoredTariffRate) -> Result<(), RepositoryError> {
        let mut guard = self.rates.lock().expect("lock");
        guard.insert(rate.hs_code.clone(), rate);
        Ok(())
    }

    fn fetch(&self, hs_code: &str) -> Result<Option<StoredTariffRate>, RepositoryError> {
        let guard = self.rates.lock().expect("lock");
        Ok(guard.get(hs_code).cloned())
    }

    fn all(&self) -> Result<Vec<StoredTariffRate>, RepositoryError> {
        let guard = self.rates.lock().expect("lock");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl TariffCacheRepository for UnavailableRepository {
    fn upsert(&self, _rate: StoredTariffRate) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _hs_code: &str) -> Result<Option<StoredTariffRate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<StoredTariffRate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn service() -> (Arc<InMemoryRepository>, TariffCacheService<InMemoryRepository>) {
    let repository = Arc::new(InMemoryRepository::default());
    let service = TariffCacheService::new(
        Arc::clone(&repository),
        TariffCacheConfig::default(),
        SavingsEstimator::default(),
    )
    .as_of(today());
    (repository, service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}
