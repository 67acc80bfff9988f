use chrono::{Duration, NaiveDate};
use usmca_compliance::workflows::tariff_cache::{
    normalize_hs_code, CacheValidator, IssueCode, RateField, TariffCacheRecord,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 20).expect("valid date")
}

fn validator() -> CacheValidator {
    CacheValidator::default().as_of(today())
}

fn documented(hs_code: &str) -> TariffCacheRecord {
    TariffCacheRecord::new(hs_code)
        .with_source("USTR Federal Register Notice 2024-xyz")
        .verified_on(today() - Duration::days(40))
}

#[test]
fn legacy_sync_row_is_blocked_with_two_errors() {
    let record = documented("7326.9070").with_rate(RateField::MfnRate, 25.0);
    let result = validator().validate_record(&record);

    assert!(!result.valid);
    assert_eq!(
        result.error_codes(),
        vec![IssueCode::InvalidFormat, IssueCode::LikelyPercentage]
    );
}

#[test]
fn documented_fractional_rate_passes_cleanly() {
    let record = documented("73269070").with_rate(RateField::MfnRate, 0.25);
    let result = validator().validate_record(&record);

    assert!(result.valid);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn every_eight_digit_code_sampled_is_accepted() {
    for seed in (0..100_000_000u32).step_by(9_999_991) {
        let code = format!("{seed:08}");
        let record = documented(&code).with_rate(RateField::MfnRate, 0.05);
        let result = validator().validate_record(&record);
        assert!(result.valid, "code {code}: {:?}", result.errors);
    }
}

#[test]
fn punctuated_codes_get_exactly_one_format_error() {
    for code in ["7326.9070", "7326.90.70", "73-26-90-70", "HS732690", "7326 9070"] {
        let result = validator().validate_record(&documented(code).with_rate(RateField::MfnRate, 0.05));
        let format_errors = result
            .errors
            .iter()
            .filter(|issue| issue.code == IssueCode::InvalidFormat)
            .count();
        assert_eq!(format_errors, 1, "code {code}");
        assert_eq!(result.errors.len(), 1, "code {code}");
    }
}

#[test]
fn rate_range_sweep() {
    for step in 1..=100 {
        let rate = f64::from(step) / 100.0;
        let result = validator().validate_record(&documented("73269070").with_rate(RateField::Section232, rate));
        assert!(result.valid, "rate {rate}");
    }

    for rate in [1.01, 2.0, 9.0, 25.0, 99.9, 100.0] {
        let result = validator().validate_record(&documented("73269070").with_rate(RateField::Section232, rate));
        assert_eq!(result.error_codes(), vec![IssueCode::LikelyPercentage], "rate {rate}");
    }

    for rate in [100.01, 145.0, 10_000.0] {
        let result = validator().validate_record(&documented("73269070").with_rate(RateField::Section232, rate));
        assert_eq!(result.error_codes(), vec![IssueCode::UnrealisticValue], "rate {rate}");
    }
}

#[test]
fn zero_rate_with_exemption_notice_passes_with_warning() {
    let record = TariffCacheRecord::new("72085100")
        .with_rate(RateField::Section232, 0.0)
        .with_source("Section 232 product exclusion, duty-free")
        .verified_on(today());
    let result = validator().validate_record(&record);
    assert!(result.valid);
    assert_eq!(result.warning_codes(), vec![IssueCode::ZeroRateWarning]);
}

#[test]
fn normalization_prepares_resubmission() {
    let normalized = normalize_hs_code("7326.90.7000").expect("normalizable");
    let record = documented(&normalized).with_rate(RateField::MfnRate, 0.05);
    assert!(validator().validate_record(&record).valid);
}
