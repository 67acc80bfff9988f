//! Annual tariff savings from a USMCA preference.

pub mod router;
pub mod volume;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use router::{savings_router, SavingsRequest};
pub use volume::parse_trade_volume;

/// Input violations that make an estimate meaningless.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SavingsError {
    #[error("annual import value cannot be negative ({0})")]
    NegativeImportValue(f64),
    #[error("{field} must be a finite number")]
    NonFiniteInput { field: &'static str },
    #[error("{field} cannot be negative ({value})")]
    NegativeRate { field: &'static str, value: f64 },
}

/// Computed values that are logically impossible but were clamped instead of rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateAnomaly {
    NegativeRateDifferential { differential: f64 },
    /// A rate above 1.0 was most likely entered as a percentage (`25` for 25%).
    LikelyPercentage { field: String, rate: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub annual_import_value: f64,
    pub mfn_rate: f64,
    pub usmca_rate: f64,
    pub rate_differential: f64,
    pub annual_savings: f64,
    pub monthly_savings: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<RateAnomaly>,
}

/// Translates a rate differential into an annual dollar figure.
#[derive(Debug, Clone, Copy)]
pub struct SavingsEstimator {
    default_trade_volume: f64,
}

impl Default for SavingsEstimator {
    fn default() -> Self {
        Self::new(crate::config::SavingsConfig::default())
    }
}

impl SavingsEstimator {
    pub fn new(config: crate::config::SavingsConfig) -> Self {
        Self {
            default_trade_volume: config.default_trade_volume,
        }
    }

    /// `annual_import_value * max(mfn_rate - usmca_rate, 0)`, rates as decimal fractions.
    pub fn estimate(
        &self,
        annual_import_value: f64,
        mfn_rate: f64,
        usmca_rate: f64,
    ) -> Result<SavingsEstimate, SavingsError> {
        if !annual_import_value.is_finite() {
            return Err(SavingsError::NonFiniteInput {
                field: "annual_import_value",
            });
        }
        if annual_import_value < 0.0 {
            return Err(SavingsError::NegativeImportValue(annual_import_value));
        }
        check_rate("mfn_rate", mfn_rate)?;
        check_rate("usmca_rate", usmca_rate)?;

        let mut anomalies: Vec<RateAnomaly> = [("mfn_rate", mfn_rate), ("usmca_rate", usmca_rate)]
            .into_iter()
            .filter(|(_, rate)| *rate > 1.0)
            .map(|(field, rate)| {
                warn!(field, rate, "rate above 1.0 looks like a percentage");
                RateAnomaly::LikelyPercentage {
                    field: field.to_string(),
                    rate,
                }
            })
            .collect();

        let differential = mfn_rate - usmca_rate;
        if differential < 0.0 {
            warn!(
                mfn_rate,
                usmca_rate, differential, "usmca rate exceeds mfn rate; savings clamped to zero"
            );
            anomalies.push(RateAnomaly::NegativeRateDifferential { differential });
        }

        let rate_differential = differential.max(0.0);
        let annual_savings = annual_import_value * rate_differential;

        Ok(SavingsEstimate {
            annual_import_value,
            mfn_rate,
            usmca_rate,
            rate_differential,
            annual_savings,
            monthly_savings: annual_savings / 12.0,
            anomalies,
        })
    }

    /// Resolve a free-text trade volume, falling back to the configured default.
    pub fn trade_volume(&self, raw: &str) -> f64 {
        match parse_trade_volume(raw) {
            Some(volume) => volume,
            None => {
                warn!(
                    raw,
                    fallback = self.default_trade_volume,
                    "unable to parse trade volume; using default"
                );
                self.default_trade_volume
            }
        }
    }
}

fn check_rate(field: &'static str, value: f64) -> Result<(), SavingsError> {
    if !value.is_finite() {
        return Err(SavingsError::NonFiniteInput { field });
    }
    if value < 0.0 {
        return Err(SavingsError::NegativeRate { field, value });
    }
    Ok(())
}
