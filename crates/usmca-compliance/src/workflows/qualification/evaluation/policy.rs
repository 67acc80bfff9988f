use super::super::domain::{QualificationLevel, QualificationWarning, ThresholdSource};
use super::super::thresholds::AppliedThreshold;
use super::rules::ContentSignals;

/// Content at least this many points above the threshold counts as highly qualified.
const HIGHLY_QUALIFIED_BUFFER: f64 = 10.0;

/// Absorbs floating-point noise from summing user-declared decimals.
const THRESHOLD_EPSILON: f64 = 1e-9;

pub(crate) struct Verdict {
    pub qualified: bool,
    pub margin: f64,
    pub level: QualificationLevel,
    pub reason: String,
    pub warnings: Vec<QualificationWarning>,
}

pub(crate) fn decide_verdict(
    signals: &ContentSignals,
    applied: &AppliedThreshold,
    raw_business_type: &str,
    sum_tolerance: f64,
) -> Verdict {
    let threshold = applied.percentage;
    let margin = signals.usmca_content - threshold;
    let qualified = margin >= -THRESHOLD_EPSILON;

    let level = if !qualified {
        QualificationLevel::NotQualified
    } else if margin >= HIGHLY_QUALIFIED_BUFFER - THRESHOLD_EPSILON {
        QualificationLevel::HighlyQualified
    } else {
        QualificationLevel::Qualified
    };

    let mut warnings = Vec::new();
    if (signals.declared_total - 100.0).abs() > sum_tolerance + THRESHOLD_EPSILON {
        warnings.push(QualificationWarning::PercentageSumMismatch {
            declared_total: signals.declared_total,
            tolerance: sum_tolerance,
        });
    }
    if applied.source == ThresholdSource::Default {
        warnings.push(QualificationWarning::UnknownBusinessType {
            value: raw_business_type.trim().to_string(),
        });
    }

    let reason = if qualified {
        format!(
            "Product meets USMCA qualification with {:.1}% North American content ({threshold}% required)",
            signals.usmca_content
        )
    } else {
        format!(
            "Product does not meet USMCA qualification: {:.1}% North American content is below the {threshold}% requirement",
            signals.usmca_content
        )
    };

    Verdict {
        qualified,
        margin,
        level,
        reason,
        warnings,
    }
}

/// Evidence normally requested to back a certificate of origin.
pub(crate) fn documentation_required(qualified: bool) -> Vec<String> {
    let mut documents = vec![
        "Bill of materials with component origins".to_string(),
        "Supplier origin declarations".to_string(),
        "Manufacturing records".to_string(),
    ];
    if qualified {
        documents.push("USMCA certification of origin".to_string());
    }
    documents
}
