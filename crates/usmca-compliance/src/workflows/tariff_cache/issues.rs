use serde::{Deserialize, Serialize};

/// Machine-readable reason attached to every validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    RequiredField,
    InvalidFormat,
    InvalidLength,
    NeedsNormalization,
    InvalidType,
    OutOfRange,
    LikelyPercentage,
    UnrealisticValue,
    ZeroRateWarning,
    UndocumentedZeroRate,
    PlaceholderSource,
    InvalidDate,
    FutureVerifiedDate,
    StaleData,
    InvalidConfidence,
    TotalRateMismatch,
    UsmcaExceedsMfn,
    UnknownField,
}

impl IssueCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            IssueCode::RequiredField => "REQUIRED_FIELD",
            IssueCode::InvalidFormat => "INVALID_FORMAT",
            IssueCode::InvalidLength => "INVALID_LENGTH",
            IssueCode::NeedsNormalization => "NEEDS_NORMALIZATION",
            IssueCode::InvalidType => "INVALID_TYPE",
            IssueCode::OutOfRange => "OUT_OF_RANGE",
            IssueCode::LikelyPercentage => "LIKELY_PERCENTAGE",
            IssueCode::UnrealisticValue => "UNREALISTIC_VALUE",
            IssueCode::ZeroRateWarning => "ZERO_RATE_WARNING",
            IssueCode::UndocumentedZeroRate => "UNDOCUMENTED_ZERO_RATE",
            IssueCode::PlaceholderSource => "PLACEHOLDER_SOURCE",
            IssueCode::InvalidDate => "INVALID_DATE",
            IssueCode::FutureVerifiedDate => "FUTURE_VERIFIED_DATE",
            IssueCode::StaleData => "STALE_DATA",
            IssueCode::InvalidConfidence => "INVALID_CONFIDENCE",
            IssueCode::TotalRateMismatch => "TOTAL_RATE_MISMATCH",
            IssueCode::UsmcaExceedsMfn => "USMCA_EXCEEDS_MFN",
            IssueCode::UnknownField => "UNKNOWN_FIELD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// A single finding against one field of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub code: IssueCode,
    pub severity: IssueSeverity,
    pub message: String,
}

impl ValidationIssue {
    pub(crate) fn error(
        field: &str,
        value: Option<String>,
        code: IssueCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.to_string(),
            value,
            code,
            severity: IssueSeverity::Error,
            message: message.into(),
        }
    }

    pub(crate) fn warning(
        field: &str,
        value: Option<String>,
        code: IssueCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            ..Self::error(field, value, code, message)
        }
    }
}

/// Outcome of gating one record. Errors block insertion; warnings pass through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub(crate) fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) = issues
            .into_iter()
            .partition(|issue| issue.severity == IssueSeverity::Error);
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn error_codes(&self) -> Vec<IssueCode> {
        self.errors.iter().map(|issue| issue.code).collect()
    }

    pub fn warning_codes(&self) -> Vec<IssueCode> {
        self.warnings.iter().map(|issue| issue.code).collect()
    }

    pub fn has_error(&self, code: IssueCode) -> bool {
        self.errors.iter().any(|issue| issue.code == code)
    }

    pub fn has_warning(&self, code: IssueCode) -> bool {
        self.warnings.iter().any(|issue| issue.code == code)
    }
}
