use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::domain::TariffCacheRecord;
use super::issues::{ValidationIssue, ValidationResult};
use super::validator::CacheValidator;

/// A record refused by the gate in strict mode.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CacheValidationError {
    #[error("record {index} ({hs_code}) failed validation: {}", summarize(.issues))]
    InvalidRecord {
        index: usize,
        hs_code: String,
        issues: Vec<ValidationIssue>,
    },
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{} {}", issue.field, issue.code.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordValidation {
    pub index: usize,
    pub hs_code: Option<String>,
    pub result: ValidationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchValidationReport {
    pub valid_count: usize,
    pub invalid_count: usize,
    pub warning_count: usize,
    pub results: Vec<RecordValidation>,
}

impl BatchValidationReport {
    pub fn all_valid(&self) -> bool {
        self.invalid_count == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Fail on the first invalid record instead of dropping it.
    #[serde(default)]
    pub throw_on_error: bool,
}

impl CacheValidator {
    /// Validate every record; aggregate counts plus per-record results in input order.
    pub fn validate_batch(&self, records: &[TariffCacheRecord]) -> BatchValidationReport {
        let today = self.today();
        let results: Vec<RecordValidation> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let result = self.validate_record_as_of(record, today);
                log_warnings(index, record, &result);
                RecordValidation {
                    index,
                    hs_code: record.hs_code.as_ref().map(ToString::to_string),
                    result,
                }
            })
            .collect();

        let valid_count = results.iter().filter(|entry| entry.result.valid).count();
        let warning_count = results
            .iter()
            .map(|entry| entry.result.warnings.len())
            .sum();
        let invalid_count = results.len() - valid_count;

        info!(
            total = results.len(),
            valid = valid_count,
            invalid = invalid_count,
            warnings = warning_count,
            "validated tariff cache batch"
        );

        BatchValidationReport {
            valid_count,
            invalid_count,
            warning_count,
            results,
        }
    }

    /// Keep only records that pass the gate, or fail on the first one that does not.
    pub fn filter_valid_records(
        &self,
        records: Vec<TariffCacheRecord>,
        options: FilterOptions,
    ) -> Result<Vec<TariffCacheRecord>, CacheValidationError> {
        let today = self.today();
        let total = records.len();
        let mut kept = Vec::with_capacity(total);

        for (index, record) in records.into_iter().enumerate() {
            let result = self.validate_record_as_of(&record, today);
            log_warnings(index, &record, &result);

            if result.valid {
                kept.push(record);
                continue;
            }

            if options.throw_on_error {
                error!(
                    index,
                    hs_code = %record.hs_code_display(),
                    errors = %summarize(&result.errors),
                    "blocking invalid tariff cache record"
                );
                return Err(invalid_record(index, &record, result));
            }

            warn!(
                index,
                hs_code = %record.hs_code_display(),
                errors = %summarize(&result.errors),
                "dropping invalid tariff cache record"
            );
        }

        info!(
            total,
            kept = kept.len(),
            dropped = total - kept.len(),
            "filtered tariff cache records"
        );
        Ok(kept)
    }

    /// Strict single-record gate: warnings come back, errors become `Err`.
    pub fn assert_valid_record(
        &self,
        record: &TariffCacheRecord,
    ) -> Result<ValidationResult, CacheValidationError> {
        let result = self.validate_record(record);
        log_warnings(0, record, &result);
        if result.valid {
            Ok(result)
        } else {
            Err(invalid_record(0, record, result))
        }
    }
}

fn invalid_record(
    index: usize,
    record: &TariffCacheRecord,
    result: ValidationResult,
) -> CacheValidationError {
    CacheValidationError::InvalidRecord {
        index,
        hs_code: record.hs_code_display(),
        issues: result.errors,
    }
}

fn log_warnings(index: usize, record: &TariffCacheRecord, result: &ValidationResult) {
    for issue in &result.warnings {
        warn!(
            index,
            hs_code = %record.hs_code_display(),
            field = %issue.field,
            code = issue.code.as_str(),
            "{}",
            issue.message
        );
    }
}
