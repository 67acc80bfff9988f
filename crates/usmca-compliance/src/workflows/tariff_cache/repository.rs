use super::domain::StoredTariffRate;

/// Storage for rates that passed the gate, keyed by HS code.
pub trait TariffCacheRepository: Send + Sync {
    fn upsert(&self, rate: StoredTariffRate) -> Result<(), RepositoryError>;
    fn fetch(&self, hs_code: &str) -> Result<Option<StoredTariffRate>, RepositoryError>;
    fn all(&self) -> Result<Vec<StoredTariffRate>, RepositoryError>;

    /// Write a batch. Implementations backed by a real store should make this atomic.
    fn upsert_all(&self, rates: Vec<StoredTariffRate>) -> Result<usize, RepositoryError> {
        let count = rates.len();
        for rate in rates {
            self.upsert(rate)?;
        }
        Ok(count)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
