//! Structured content for qualification reports and certificate worksheets.
//!
//! The report is a list of titled sections holding label/value fields. Renderers (plain text
//! in the CLI, a document library elsewhere) consume this model; nothing here knows about
//! layout.

use serde::Serialize;

use super::domain::{QualificationResult, ThresholdSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub fields: Vec<ReportField>,
}

impl ReportSection {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            fields: Vec::new(),
        }
    }

    fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(ReportField {
            label: label.into(),
            value: value.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualificationReport {
    pub product: String,
    pub sections: Vec<ReportSection>,
}

impl QualificationReport {
    pub fn build(product: &str, result: &QualificationResult) -> Self {
        let business_type = match (result.business_type, result.threshold_source) {
            (Some(business_type), ThresholdSource::BusinessType) => {
                business_type.label().to_string()
            }
            _ => "Unrecognized (default threshold)".to_string(),
        };

        let verdict = ReportSection::new("Qualification")
            .field("Status", result.qualification_level.label())
            .field("Business type", business_type)
            .field(
                "Regional value content",
                format!("{:.1}%", result.usmca_content_percentage),
            )
            .field(
                "Required threshold",
                format!("{:.1}%", result.required_threshold),
            )
            .field("Margin", format!("{:+.1} points", result.margin))
            .field("Reason", result.reason.clone());

        let components = result.component_breakdown.iter().fold(
            ReportSection::new("Component origins"),
            |section, line| {
                let origin = match line.usmca_member {
                    Some(member) => format!("{} (USMCA)", member.label()),
                    None => format!("{} (non-USMCA)", line.origin_country),
                };
                section.field(
                    line.description.clone(),
                    format!("{origin}, {:.1}%", line.value_percentage),
                )
            },
        );

        let documentation = result.documentation_required.iter().fold(
            ReportSection::new("Documentation required"),
            |section, document| section.field("Document", document.clone()),
        );

        let mut sections = vec![verdict, components, documentation];

        if !result.warnings.is_empty() {
            sections.push(result.warnings.iter().fold(
                ReportSection::new("Data quality warnings"),
                |section, warning| section.field("Warning", warning.message()),
            ));
        }

        Self {
            product: product.to_string(),
            sections,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = format!("USMCA qualification report: {}\n", self.product);
        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.title);
            out.push('\n');
            for field in &section.fields {
                out.push_str(&format!("- {}: {}\n", field.label, field.value));
            }
        }
        out
    }
}
