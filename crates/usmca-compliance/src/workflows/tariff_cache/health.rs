//! Whole-cache health report.
//!
//! Record-level gating cannot see population-level corruption: a sync job that silently
//! zeroes every Section 301 rate, or a China-origin code with no 301 rate at all. These
//! checks run over the full set of cached rows and roll up into a status an alerting job can
//! turn into an exit code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::TariffCacheConfig;

use super::domain::{RateField, TariffCacheRecord};

/// Known legitimate Section 232 exemptions, plus slack for newly published exclusions.
pub const EXPECTED_SECTION_232_EXEMPTIONS: usize = 47;
pub const SECTION_232_EXEMPTION_SLACK: usize = 5;
const STALE_SHARE_LIMIT: f64 = 5.0;
const VOLATILE_STALE_SHARE_LIMIT: f64 = 10.0;
const STEEL_CHAPTER: &str = "73";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthSeverity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub passed: bool,
    pub severity: HealthSeverity,
    pub affected: usize,
    pub message: String,
}

impl HealthCheck {
    fn new(name: &str, severity: HealthSeverity, affected: usize, message: String) -> Self {
        Self {
            name: name.to_string(),
            passed: affected == 0,
            severity,
            affected,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Warnings,
    Critical,
}

impl HealthStatus {
    /// Alerting convention: 0 healthy, 2 warnings only, 1 any critical failure.
    pub const fn exit_code(self) -> u8 {
        match self {
            HealthStatus::Healthy => 0,
            HealthStatus::Warnings => 2,
            HealthStatus::Critical => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheHealthReport {
    pub checked_on: NaiveDate,
    pub total_records: usize,
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
}

impl CacheHealthReport {
    pub fn failed(&self) -> impl Iterator<Item = &HealthCheck> {
        self.checks.iter().filter(|check| !check.passed)
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(
            "Tariff cache health ({} records, checked {}): {:?}\n",
            self.total_records, self.checked_on, self.status
        );
        for check in &self.checks {
            let marker = match (check.passed, check.severity) {
                (true, _) => "PASS",
                (false, HealthSeverity::Warning) => "WARN",
                (false, HealthSeverity::Critical) => "FAIL",
            };
            out.push_str(&format!("[{marker}] {}: {}\n", check.name, check.message));
        }
        out
    }
}

pub fn assess_cache_health(
    records: &[TariffCacheRecord],
    today: NaiveDate,
    config: &TariffCacheConfig,
) -> CacheHealthReport {
    let checks = vec![
        section_301_zeros(records),
        section_232_zeros(records),
        ghost_codes(records),
        china_without_301(records),
        steel_without_232(records),
        freshness(records, today, config),
        hs_code_format(records),
        rate_range(records),
    ];

    let status = match checks.iter().filter(|check| !check.passed).map(|check| check.severity).max() {
        None => HealthStatus::Healthy,
        Some(HealthSeverity::Warning) => HealthStatus::Warnings,
        Some(HealthSeverity::Critical) => HealthStatus::Critical,
    };

    CacheHealthReport {
        checked_on: today,
        total_records: records.len(),
        status,
        checks,
    }
}

fn rate_value(record: &TariffCacheRecord, field: RateField) -> Option<f64> {
    record.rate(field).and_then(|value| value.parse_lenient())
}

fn digits(record: &TariffCacheRecord) -> String {
    record
        .hs_code()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect()
}

fn section_301_zeros(records: &[TariffCacheRecord]) -> HealthCheck {
    let zeros = records
        .iter()
        .filter(|record| rate_value(record, RateField::Section301) == Some(0.0))
        .count();
    HealthCheck::new(
        "section_301_zero_rates",
        HealthSeverity::Critical,
        zeros,
        format!("{zeros} records carry a zero Section 301 rate"),
    )
}

fn section_232_zeros(records: &[TariffCacheRecord]) -> HealthCheck {
    let zeros = records
        .iter()
        .filter(|record| rate_value(record, RateField::Section232) == Some(0.0))
        .count();
    let limit = EXPECTED_SECTION_232_EXEMPTIONS + SECTION_232_EXEMPTION_SLACK;
    let mut check = HealthCheck::new(
        "section_232_zero_rates",
        HealthSeverity::Warning,
        zeros.saturating_sub(limit),
        format!(
            "{zeros} zero Section 232 rates (expected about {EXPECTED_SECTION_232_EXEMPTIONS} exemptions)"
        ),
    );
    check.passed = zeros <= limit;
    check
}

fn ghost_codes(records: &[TariffCacheRecord]) -> HealthCheck {
    let ghosts = records
        .iter()
        .filter(|record| record.section_301.is_none() && record.section_232.is_none())
        .count();
    HealthCheck::new(
        "ghost_codes",
        HealthSeverity::Warning,
        ghosts,
        format!("{ghosts} records have neither a Section 301 nor a Section 232 rate"),
    )
}

fn china_without_301(records: &[TariffCacheRecord]) -> HealthCheck {
    let missing = records
        .iter()
        .filter(|record| record.is_china_origin() && record.section_301.is_none())
        .count();
    HealthCheck::new(
        "china_section_301_coverage",
        HealthSeverity::Critical,
        missing,
        format!("{missing} China-origin records have no Section 301 rate"),
    )
}

fn steel_without_232(records: &[TariffCacheRecord]) -> HealthCheck {
    let missing = records
        .iter()
        .filter(|record| digits(record).starts_with(STEEL_CHAPTER) && record.section_232.is_none())
        .count();
    HealthCheck::new(
        "steel_section_232_coverage",
        HealthSeverity::Warning,
        missing,
        format!("{missing} chapter {STEEL_CHAPTER} records have no Section 232 rate"),
    )
}

fn freshness(
    records: &[TariffCacheRecord],
    today: NaiveDate,
    config: &TariffCacheConfig,
) -> HealthCheck {
    let is_fresh = |record: &TariffCacheRecord, window: i64| {
        record
            .parsed_verified_date()
            .map(|date| (today - date).num_days() <= window)
            .unwrap_or(false)
    };

    let stale = records
        .iter()
        .filter(|record| !is_fresh(record, config.freshness_window_days))
        .count();
    let stale_share = share(stale, records.len());

    let volatile: Vec<&TariffCacheRecord> = records
        .iter()
        .filter(|record| record.is_china_origin() && record.section_301.is_some())
        .collect();
    let volatile_stale = volatile
        .iter()
        .filter(|record| !is_fresh(record, config.volatile_window_days))
        .count();
    let volatile_share = share(volatile_stale, volatile.len());

    let volatile_failed = volatile_share > VOLATILE_STALE_SHARE_LIMIT;
    let overall_failed = stale_share > STALE_SHARE_LIMIT;

    HealthCheck {
        name: "freshness".to_string(),
        passed: !volatile_failed && !overall_failed,
        severity: if volatile_failed {
            HealthSeverity::Critical
        } else {
            HealthSeverity::Warning
        },
        affected: stale,
        message: format!(
            "{stale_share:.1}% of records older than {} days; {volatile_share:.1}% of China Section 301 rates older than {} days",
            config.freshness_window_days, config.volatile_window_days
        ),
    }
}

fn hs_code_format(records: &[TariffCacheRecord]) -> HealthCheck {
    let with_periods = records
        .iter()
        .filter(|record| record.hs_code().is_some_and(|code| code.contains('.')))
        .count();
    let ten_digit = records
        .iter()
        .filter(|record| {
            record
                .hs_code()
                .is_some_and(|code| code.len() == 10 && code.chars().all(|c| c.is_ascii_digit()))
        })
        .count();
    HealthCheck::new(
        "hs_code_format",
        HealthSeverity::Warning,
        with_periods + ten_digit,
        format!("{with_periods} codes contain periods; {ten_digit} codes are 10-digit"),
    )
}

fn rate_range(records: &[TariffCacheRecord]) -> HealthCheck {
    let out_of_range = records
        .iter()
        .filter(|record| {
            RateField::ALL
                .into_iter()
                .filter_map(|field| rate_value(record, field))
                .any(|rate| rate > 1.0)
        })
        .count();
    HealthCheck::new(
        "rate_range",
        HealthSeverity::Critical,
        out_of_range,
        format!("{out_of_range} records store a rate above 1.0"),
    )
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
