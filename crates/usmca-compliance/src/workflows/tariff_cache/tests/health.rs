use super::common::*;
use crate::config::TariffCacheConfig;
use crate::workflows::tariff_cache::{
    assess_cache_health, CacheHealthReport, HealthCheck, HealthStatus, RateField, TariffCacheRecord,
};

fn assess(records: &[TariffCacheRecord]) -> CacheHealthReport {
    assess_cache_health(records, today(), &TariffCacheConfig::default())
}

fn check<'a>(report: &'a CacheHealthReport, name: &str) -> &'a HealthCheck {
    report
        .checks
        .iter()
        .find(|check| check.name == name)
        .expect("check present")
}

#[test]
fn clean_cache_is_healthy() {
    let records = vec![clean_record("73269070"), clean_record("732690")];
    let report = assess(&records);
    assert_eq!(report.status, HealthStatus::Healthy);
    assert_eq!(report.status.exit_code(), 0);
    assert_eq!(report.failed().count(), 0);
}

#[test]
fn zeroed_section_301_rates_are_critical() {
    let records = vec![
        clean_record("73269070"),
        clean_record("84713001").with_rate(RateField::Section301, 0.0),
    ];
    let report = assess(&records);
    assert_eq!(report.status, HealthStatus::Critical);
    assert_eq!(report.status.exit_code(), 1);
    assert_eq!(check(&report, "section_301_zero_rates").affected, 1);
}

#[test]
fn section_232_zeros_tolerate_known_exemptions() {
    let within: Vec<_> = (0..52)
        .map(|n| clean_record(&format!("7208{n:04}")).with_rate(RateField::Section232, 0.0))
        .collect();
    assert!(check(&assess(&within), "section_232_zero_rates").passed);

    let beyond: Vec<_> = (0..53)
        .map(|n| clean_record(&format!("7208{n:04}")).with_rate(RateField::Section232, 0.0))
        .collect();
    let report = assess(&beyond);
    assert!(!check(&report, "section_232_zero_rates").passed);
    assert_eq!(report.status, HealthStatus::Warnings);
    assert_eq!(report.status.exit_code(), 2);
}

#[test]
fn coverage_gaps_are_reported() {
    let mut ghost = clean_record("85176200");
    ghost.section_232 = None;
    let mut china = clean_record("85176201").with_origin("China");
    china.section_232 = None;
    let mut steel = clean_record("73181500").with_rate(RateField::Section301, 0.25);
    steel.section_232 = None;

    let report = assess(&[ghost, china, steel]);
    assert_eq!(check(&report, "ghost_codes").affected, 2);
    assert_eq!(check(&report, "china_section_301_coverage").affected, 1);
    assert_eq!(check(&report, "steel_section_232_coverage").affected, 1);
    assert_eq!(report.status, HealthStatus::Critical);
}

#[test]
fn stale_share_above_five_percent_warns() {
    let mut records: Vec<_> = (0..19)
        .map(|n| clean_record(&format!("7326{n:04}")))
        .collect();
    records.push(clean_record("73260099").verified_on(days_ago(100)));
    assert!(check(&assess(&records), "freshness").passed);

    records.push(clean_record("73260098").verified_on(days_ago(100)));
    let report = assess(&records);
    assert!(!check(&report, "freshness").passed);
    assert_eq!(report.status, HealthStatus::Warnings);
}

#[test]
fn stale_china_section_301_rates_are_critical() {
    let records: Vec<_> = (0..4)
        .map(|n| {
            clean_record(&format!("8517{n:04}"))
                .with_rate(RateField::Section301, 0.25)
                .with_origin("CN")
                .verified_on(days_ago(if n == 0 { 8 } else { 1 }))
        })
        .collect();
    let report = assess(&records);
    let freshness = check(&report, "freshness");
    assert!(!freshness.passed);
    assert_eq!(report.status, HealthStatus::Critical);
}

#[test]
fn legacy_format_and_percentage_rows_are_flagged() {
    let dotted = clean_record("7326.90.70");
    let statistical = clean_record("7326907000");
    let percentage = clean_record("73269070").with_rate(RateField::Section232, 25.0);

    let report = assess(&[dotted, statistical, percentage]);
    assert_eq!(check(&report, "hs_code_format").affected, 2);
    assert_eq!(check(&report, "rate_range").affected, 1);
    assert_eq!(report.status, HealthStatus::Critical);
    assert!(report.render_text().contains("[FAIL] rate_range"));
}

#[test]
fn empty_cache_passes_freshness() {
    let report = assess(&[]);
    assert_eq!(report.total_records, 0);
    assert!(check(&report, "freshness").passed);
}
