use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{BusinessType, ThresholdSource};

/// Required regional value content per industry, with a documented fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSchedule {
    thresholds: BTreeMap<BusinessType, f64>,
    default_threshold: f64,
}

/// Threshold chosen for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedThreshold {
    pub business_type: Option<BusinessType>,
    pub percentage: f64,
    pub source: ThresholdSource,
}

impl ThresholdSchedule {
    /// The schedule in force for general USMCA product-specific rules.
    pub fn standard(default_threshold: f64) -> Self {
        let thresholds = BusinessType::ALL
            .into_iter()
            .map(|business_type| (business_type, standard_threshold(business_type)))
            .collect();

        Self {
            thresholds,
            default_threshold,
        }
    }

    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }

    pub fn set(&mut self, business_type: BusinessType, percentage: f64) {
        self.thresholds.insert(business_type, percentage);
    }

    pub fn threshold_for(&self, business_type: BusinessType) -> f64 {
        self.thresholds
            .get(&business_type)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    /// Resolve a free-text business type; unknown names fall back to the default.
    pub fn resolve(&self, raw_business_type: &str) -> AppliedThreshold {
        match BusinessType::resolve(raw_business_type) {
            Some(business_type) => AppliedThreshold {
                business_type: Some(business_type),
                percentage: self.threshold_for(business_type),
                source: ThresholdSource::BusinessType,
            },
            None => AppliedThreshold {
                business_type: None,
                percentage: self.default_threshold,
                source: ThresholdSource::Default,
            },
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (BusinessType, f64)> + '_ {
        self.thresholds
            .iter()
            .map(|(business_type, percentage)| (*business_type, *percentage))
    }
}

const fn standard_threshold(business_type: BusinessType) -> f64 {
    match business_type {
        BusinessType::GeneralManufacturing => 60.0,
        BusinessType::Automotive => 75.0,
        BusinessType::Textiles => 62.5,
        BusinessType::Electronics => 65.0,
        BusinessType::Machinery => 60.0,
        BusinessType::Chemicals => 62.5,
    }
}
