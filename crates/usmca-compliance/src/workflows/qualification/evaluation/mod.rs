mod policy;
mod rules;

use tracing::{debug, warn};

use super::domain::{Component, ComponentSubmission, QualificationResult};
use super::intake::{IntakeGuard, InvalidInputError};
use super::thresholds::ThresholdSchedule;
use crate::config::QualificationConfig;
use policy::{decide_verdict, documentation_required};

/// Stateless evaluator applying the threshold schedule to a component ledger.
#[derive(Debug, Clone)]
pub struct QualificationEvaluator {
    schedule: ThresholdSchedule,
    sum_tolerance: f64,
    guard: IntakeGuard,
}

impl Default for QualificationEvaluator {
    fn default() -> Self {
        Self::new(QualificationConfig::default())
    }
}

impl QualificationEvaluator {
    pub fn new(config: QualificationConfig) -> Self {
        Self {
            schedule: config.thresholds,
            sum_tolerance: config.sum_tolerance,
            guard: IntakeGuard,
        }
    }

    pub fn schedule(&self) -> &ThresholdSchedule {
        &self.schedule
    }

    /// Decide USMCA eligibility for a set of components under a business type.
    pub fn evaluate(
        &self,
        components: &[Component],
        business_type: &str,
    ) -> Result<QualificationResult, InvalidInputError> {
        self.guard.check(components)?;

        let signals = rules::tally_components(components);
        let applied = self.schedule.resolve(business_type);
        let verdict = decide_verdict(&signals, &applied, business_type, self.sum_tolerance);

        for warning in &verdict.warnings {
            warn!(business_type, warning = %warning.message(), "qualification input flagged");
        }
        debug!(
            business_type,
            usmca_content = signals.usmca_content,
            threshold = applied.percentage,
            qualified = verdict.qualified,
            "qualification evaluated"
        );

        Ok(QualificationResult {
            usmca_content_percentage: signals.usmca_content,
            non_usmca_content_percentage: signals.non_usmca_content,
            declared_total_percentage: signals.declared_total,
            required_threshold: applied.percentage,
            qualified: verdict.qualified,
            margin: verdict.margin,
            qualification_level: verdict.level,
            business_type: applied.business_type,
            threshold_source: applied.source,
            low_confidence: !verdict.warnings.is_empty(),
            warnings: verdict.warnings,
            reason: verdict.reason,
            documentation_required: documentation_required(verdict.qualified),
            component_breakdown: signals.breakdown,
        })
    }

    /// Evaluate raw form submissions, rejecting percentages that are not numbers.
    pub fn evaluate_submissions(
        &self,
        submissions: Vec<ComponentSubmission>,
        business_type: &str,
    ) -> Result<QualificationResult, InvalidInputError> {
        let components = self.guard.components_from_submissions(submissions)?;
        self.evaluate(&components, business_type)
    }
}
