use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use usmca_compliance::workflows::tariff_cache::{
    RepositoryError, StoredTariffRate, TariffCacheRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local rate table used by the service and the CLI demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryTariffCacheRepository {
    rates: Arc<Mutex<BTreeMap<String, StoredTariffRate>>>,
}

impl InMemoryTariffCacheRepository {
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, StoredTariffRate>>, RepositoryError> {
        self.rates
            .lock()
            .map_err(|_| RepositoryError::Unavailable("rate table mutex poisoned".to_string()))
    }
}

impl TariffCacheRepository for InMemoryTariffCacheRepository {
    fn upsert(&self, rate: StoredTariffRate) -> Result<(), RepositoryError> {
        self.lock()?.insert(rate.hs_code.clone(), rate);
        Ok(())
    }

    fn fetch(&self, hs_code: &str) -> Result<Option<StoredTariffRate>, RepositoryError> {
        Ok(self.lock()?.get(hs_code).cloned())
    }

    fn all(&self) -> Result<Vec<StoredTariffRate>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn upsert_all(&self, rates: Vec<StoredTariffRate>) -> Result<usize, RepositoryError> {
        let mut guard = self.lock()?;
        let count = rates.len();
        for rate in rates {
            guard.insert(rate.hs_code.clone(), rate);
        }
        Ok(count)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
