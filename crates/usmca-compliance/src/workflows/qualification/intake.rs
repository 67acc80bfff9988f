use super::domain::{Component, ComponentSubmission};

/// Caller-supplied component data that violates basic numeric or shape constraints.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("at least one component is required")]
    EmptyComponents,
    #[error("component {index} has a non-numeric value percentage ({value})")]
    NonNumericPercentage { index: usize, value: String },
    #[error("component {index} has a negative value percentage ({value})")]
    NegativePercentage { index: usize, value: f64 },
    #[error("component {index} has a value percentage above 100 ({value})")]
    PercentageAboveHundred { index: usize, value: f64 },
}

/// Guard that checks component lines before they reach the evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Convert form submissions into typed components, rejecting non-numeric percentages.
    pub fn components_from_submissions(
        &self,
        submissions: Vec<ComponentSubmission>,
    ) -> Result<Vec<Component>, InvalidInputError> {
        let components = submissions
            .into_iter()
            .enumerate()
            .map(|(index, submission)| {
                let value_percentage = submission.value_percentage.parse_lenient().ok_or_else(
                    || InvalidInputError::NonNumericPercentage {
                        index,
                        value: submission.value_percentage.to_string(),
                    },
                )?;

                Ok(Component {
                    description: submission.description,
                    origin_country: submission.origin_country,
                    value_percentage,
                    hs_code: submission.hs_code,
                })
            })
            .collect::<Result<Vec<_>, InvalidInputError>>()?;

        self.check(&components)?;
        Ok(components)
    }

    /// Verify the list is non-empty and every percentage is a finite number in [0, 100].
    pub fn check(&self, components: &[Component]) -> Result<(), InvalidInputError> {
        if components.is_empty() {
            return Err(InvalidInputError::EmptyComponents);
        }

        for (index, component) in components.iter().enumerate() {
            let value = component.value_percentage;
            if !value.is_finite() {
                return Err(InvalidInputError::NonNumericPercentage {
                    index,
                    value: value.to_string(),
                });
            }
            if value < 0.0 {
                return Err(InvalidInputError::NegativePercentage { index, value });
            }
            if value > 100.0 {
                return Err(InvalidInputError::PercentageAboveHundred { index, value });
            }
        }

        Ok(())
    }
}
