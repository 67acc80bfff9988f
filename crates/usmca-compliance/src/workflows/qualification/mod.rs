//! USMCA regional value content qualification.
//!
//! Components are checked by the intake guard, tallied into USMCA and non-USMCA content,
//! and compared against the threshold for the product's business type. The evaluator is a
//! pure function of its inputs; warnings flag low-confidence input instead of rejecting it.

pub mod domain;
mod evaluation;
pub mod intake;
pub mod report;
pub mod router;
pub mod thresholds;

#[cfg(test)]
mod tests;

pub use domain::{
    BusinessType, Component, ComponentBreakdown, ComponentSubmission, QualificationLevel,
    QualificationResult, QualificationWarning, ThresholdSource, UsmcaMember,
};
pub use evaluation::QualificationEvaluator;
pub use intake::{IntakeGuard, InvalidInputError};
pub use report::{QualificationReport, ReportField, ReportSection};
pub use router::{qualification_router, QualificationRequest, QualificationResponse};
pub use thresholds::{AppliedThreshold, ThresholdSchedule};
