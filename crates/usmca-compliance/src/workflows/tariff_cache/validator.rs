use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::config::TariffCacheConfig;
use crate::workflows::numeric::DeclaredNumber;

use super::domain::{DeclaredText, RateField, TariffCacheRecord, CONFIDENCE_LEVELS};
use super::hs_code::{check_hs_code, normalize_hs_code, HsCodeProblem};
use super::issues::{IssueCode, ValidationIssue, ValidationResult};

const PLACEHOLDER_SOURCES: [&str; 7] = ["", "unknown", "n/a", "na", "none", "null", "tbd"];
const EXEMPTION_MARKERS: [&str; 5] = ["exempt", "duty-free", "duty free", "exclusion", "excluded"];
/// Allowed drift between `total_rate` and its components, in fraction units.
const TOTAL_RATE_TOLERANCE: f64 = 1e-4;

/// Write-time gate for tariff cache records.
///
/// Every check runs on every record so a caller sees all problems at once. The validator
/// never rewrites a record; normalization hints are carried in the issue message.
#[derive(Debug, Clone, Copy)]
pub struct CacheValidator {
    freshness_window_days: i64,
    pinned_today: Option<NaiveDate>,
}

impl Default for CacheValidator {
    fn default() -> Self {
        Self::new(TariffCacheConfig::default())
    }
}

impl CacheValidator {
    pub fn new(config: TariffCacheConfig) -> Self {
        Self {
            freshness_window_days: config.freshness_window_days,
            pinned_today: None,
        }
    }

    /// Evaluate freshness against a fixed date instead of the system clock.
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.pinned_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.pinned_today
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn validate_record(&self, record: &TariffCacheRecord) -> ValidationResult {
        self.validate_record_as_of(record, self.today())
    }

    pub fn validate_record_as_of(
        &self,
        record: &TariffCacheRecord,
        today: NaiveDate,
    ) -> ValidationResult {
        let mut issues = Vec::new();

        hs_code_issues(record.hs_code.as_ref(), &mut issues);
        let documented_exemption = source_issues(record.data_source.as_ref(), &mut issues);
        for (field, value) in record.present_rates() {
            rate_issues(field, value, documented_exemption, &mut issues);
        }
        rate_consistency_issues(record, &mut issues);
        self.date_issues(record.verified_date.as_ref(), today, &mut issues);
        if let Some(confidence) = record.confidence.as_ref() {
            confidence_issues(confidence, &mut issues);
        }
        unknown_field_issues(&record.extra, &mut issues);

        ValidationResult::from_issues(issues)
    }

    fn date_issues(
        &self,
        declared: Option<&DeclaredText>,
        today: NaiveDate,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if let Some(declared) = declared.filter(|value| value.as_text().is_none()) {
            issues.push(type_issue("verified_date", declared));
            return;
        }

        let raw = match declared.and_then(DeclaredText::as_text).map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                issues.push(ValidationIssue::error(
                    "verified_date",
                    None,
                    IssueCode::RequiredField,
                    "verified_date is required",
                ));
                return;
            }
        };

        let Some(verified) = super::domain::parse_verified_date(raw) else {
            issues.push(ValidationIssue::error(
                "verified_date",
                Some(raw.to_string()),
                IssueCode::InvalidDate,
                format!("verified_date '{raw}' is not a recognizable date"),
            ));
            return;
        };

        if verified > today {
            issues.push(ValidationIssue::warning(
                "verified_date",
                Some(raw.to_string()),
                IssueCode::FutureVerifiedDate,
                format!("verified_date {verified} is after {today}"),
            ));
            return;
        }

        let age_days = (today - verified).num_days();
        if age_days > self.freshness_window_days {
            issues.push(ValidationIssue::warning(
                "verified_date",
                Some(raw.to_string()),
                IssueCode::StaleData,
                format!(
                    "rate was verified {age_days} days ago (limit {} days)",
                    self.freshness_window_days
                ),
            ));
        }
    }
}

/// A text field that arrived as some other JSON type.
fn type_issue(field: &str, declared: &DeclaredText) -> ValidationIssue {
    ValidationIssue::error(
        field,
        Some(declared.to_string()),
        IssueCode::InvalidType,
        format!("{field} must be a string, got {} {declared}", declared.kind()),
    )
}

fn hs_code_issues(declared: Option<&DeclaredText>, issues: &mut Vec<ValidationIssue>) {
    if let Some(declared) = declared.filter(|value| value.as_text().is_none()) {
        let mut issue = type_issue("hs_code", declared);
        if let Some(code) = normalize_hs_code(&declared.to_string()) {
            issue.message.push_str(&format!("; submit as \"{code}\""));
        }
        issues.push(issue);
        return;
    }

    let raw = declared.and_then(DeclaredText::as_text);
    let Some(problem) = check_hs_code(raw) else {
        return;
    };
    let value = raw.map(str::to_string);
    let shown = raw.unwrap_or_default();

    let issue = match problem {
        HsCodeProblem::Missing => ValidationIssue::error(
            "hs_code",
            value,
            IssueCode::RequiredField,
            "hs_code is required",
        ),
        HsCodeProblem::NonDigit => {
            let hint = normalize_hs_code(shown)
                .map(|code| format!("; submit as {code}"))
                .unwrap_or_default();
            ValidationIssue::error(
                "hs_code",
                value,
                IssueCode::InvalidFormat,
                format!("hs_code '{shown}' must contain digits only{hint}"),
            )
        }
        HsCodeProblem::TenDigit => ValidationIssue::error(
            "hs_code",
            value,
            IssueCode::NeedsNormalization,
            format!(
                "hs_code '{shown}' is a 10-digit statistical code; submit as {}",
                &shown[..8]
            ),
        ),
        HsCodeProblem::BadLength(length) => ValidationIssue::error(
            "hs_code",
            value,
            IssueCode::InvalidLength,
            format!("hs_code must have 6 or 8 digits, found {length}"),
        ),
    };
    issues.push(issue);
}

/// Returns whether the source documents an exemption, which legitimizes zero rates.
fn source_issues(declared: Option<&DeclaredText>, issues: &mut Vec<ValidationIssue>) -> bool {
    if let Some(declared) = declared.filter(|value| value.as_text().is_none()) {
        issues.push(type_issue("data_source", declared));
        return false;
    }

    let Some(source) = declared.and_then(DeclaredText::as_text) else {
        issues.push(ValidationIssue::error(
            "data_source",
            None,
            IssueCode::RequiredField,
            "data_source is required",
        ));
        return false;
    };

    let normalized = source.trim().to_ascii_lowercase();
    if PLACEHOLDER_SOURCES.contains(&normalized.as_str()) {
        issues.push(ValidationIssue::error(
            "data_source",
            Some(source.to_string()),
            IssueCode::PlaceholderSource,
            format!("data_source '{source}' is a placeholder"),
        ));
        return false;
    }

    EXEMPTION_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

fn rate_issues(
    field: RateField,
    value: &DeclaredNumber,
    documented_exemption: bool,
    issues: &mut Vec<ValidationIssue>,
) {
    let name = field.name();
    let shown = Some(value.to_string());

    let Some(rate) = value.as_number() else {
        issues.push(ValidationIssue::error(
            name,
            shown,
            IssueCode::InvalidType,
            format!("{name} must be a number, got {value}"),
        ));
        return;
    };

    if rate < 0.0 {
        issues.push(ValidationIssue::error(
            name,
            shown,
            IssueCode::OutOfRange,
            format!("{name} cannot be negative ({rate})"),
        ));
    } else if rate == 0.0 {
        issues.push(ValidationIssue::warning(
            name,
            shown.clone(),
            IssueCode::ZeroRateWarning,
            format!("{name} is zero; confirm the exemption"),
        ));
        if !documented_exemption {
            issues.push(ValidationIssue::error(
                name,
                shown,
                IssueCode::UndocumentedZeroRate,
                format!("{name} is zero but data_source does not document an exemption"),
            ));
        }
    } else if rate > 100.0 {
        issues.push(ValidationIssue::error(
            name,
            shown,
            IssueCode::UnrealisticValue,
            format!("{name} of {rate} is not a plausible rate"),
        ));
    } else if rate > 1.0 {
        issues.push(ValidationIssue::error(
            name,
            shown,
            IssueCode::LikelyPercentage,
            format!(
                "{name} of {rate} looks like a percentage; store {} instead",
                rate / 100.0
            ),
        ));
    }
}

/// `total_rate` must add up from its parts, and the preferential rate must not exceed MFN.
fn rate_consistency_issues(record: &TariffCacheRecord, issues: &mut Vec<ValidationIssue>) {
    // `Some(None)` is an absent column; `None` is a column that failed the type check.
    let numeric = |field: RateField| match record.rate(field) {
        Some(value) => value.as_number().map(Some),
        None => Some(None),
    };

    if let (Some(Some(total)), Some(base), Some(mfn), Some(s301), Some(s232)) = (
        numeric(RateField::TotalRate),
        numeric(RateField::BaseMfnRate),
        numeric(RateField::MfnRate),
        numeric(RateField::Section301),
        numeric(RateField::Section232),
    ) {
        let base = base.or(mfn).unwrap_or(0.0);
        let expected = base + s301.unwrap_or(0.0) + s232.unwrap_or(0.0);
        if (expected - total).abs() > TOTAL_RATE_TOLERANCE {
            issues.push(ValidationIssue::error(
                RateField::TotalRate.name(),
                Some(total.to_string()),
                IssueCode::TotalRateMismatch,
                format!(
                    "total_rate {total} does not match base {base} + section_301 {} + section_232 {} = {expected}",
                    s301.unwrap_or(0.0),
                    s232.unwrap_or(0.0)
                ),
            ));
        }
    }

    if let (Some(Some(usmca)), Some(Some(mfn))) =
        (numeric(RateField::UsmcaRate), numeric(RateField::MfnRate))
    {
        if usmca > mfn {
            issues.push(ValidationIssue::warning(
                RateField::UsmcaRate.name(),
                Some(usmca.to_string()),
                IssueCode::UsmcaExceedsMfn,
                format!("usmca_rate {usmca} exceeds mfn_rate {mfn}"),
            ));
        }
    }
}

/// Columns outside the schema would be dropped on insert; rate-like ones block the record.
fn unknown_field_issues(extra: &BTreeMap<String, Value>, issues: &mut Vec<ValidationIssue>) {
    for (name, value) in extra {
        let shown = Some(match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        });
        let issue = if RateField::looks_like_rate(name) {
            ValidationIssue::error(
                name,
                shown,
                IssueCode::UnknownField,
                format!("rate column '{name}' is not recognized and cannot be range checked"),
            )
        } else {
            ValidationIssue::warning(
                name,
                shown,
                IssueCode::UnknownField,
                format!("field '{name}' is not part of the cache schema and will not be stored"),
            )
        };
        issues.push(issue);
    }
}

fn confidence_issues(value: &DeclaredNumber, issues: &mut Vec<ValidationIssue>) {
    let recognized = value
        .as_number()
        .map(|number| {
            CONFIDENCE_LEVELS
                .iter()
                .any(|level| f64::from(*level) == number)
        })
        .unwrap_or(false);

    if !recognized {
        issues.push(ValidationIssue::warning(
            "confidence",
            Some(value.to_string()),
            IssueCode::InvalidConfidence,
            format!("confidence {value} is not one of {CONFIDENCE_LEVELS:?}"),
        ));
    }
}
