use serde::{Deserialize, Serialize};

use crate::workflows::numeric::DeclaredNumber;

/// Component line as collected from a form or upload, before numeric validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSubmission {
    pub description: String,
    pub origin_country: String,
    pub value_percentage: DeclaredNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hs_code: Option<String>,
}

/// One declared input to a qualification analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub description: String,
    pub origin_country: String,
    /// Share of total product value, 0 to 100.
    pub value_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hs_code: Option<String>,
}

impl Component {
    pub fn new(
        description: impl Into<String>,
        origin_country: impl Into<String>,
        value_percentage: f64,
    ) -> Self {
        Self {
            description: description.into(),
            origin_country: origin_country.into(),
            value_percentage,
            hs_code: None,
        }
    }

    pub fn with_hs_code(mut self, hs_code: impl Into<String>) -> Self {
        self.hs_code = Some(hs_code.into());
        self
    }

    /// The USMCA member this component originates in, if any.
    pub fn usmca_member(&self) -> Option<UsmcaMember> {
        UsmcaMember::from_origin(&self.origin_country)
    }
}

/// Parties to the agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsmcaMember {
    UnitedStates,
    Canada,
    Mexico,
}

impl UsmcaMember {
    /// Resolve a declared origin under any accepted spelling or code form.
    pub fn from_origin(origin: &str) -> Option<Self> {
        let normalized = origin
            .trim()
            .trim_end_matches('.')
            .replace('.', "")
            .to_uppercase();

        match normalized.as_str() {
            "US" | "USA" | "UNITED STATES" | "UNITED STATES OF AMERICA" => {
                Some(Self::UnitedStates)
            }
            "CA" | "CAN" | "CANADA" => Some(Self::Canada),
            "MX" | "MEX" | "MEXICO" | "MÉXICO" => Some(Self::Mexico),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::UnitedStates => "US",
            Self::Canada => "CA",
            Self::Mexico => "MX",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UnitedStates => "United States",
            Self::Canada => "Canada",
            Self::Mexico => "Mexico",
        }
    }
}

/// Industries with a distinct regional value content requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    GeneralManufacturing,
    Automotive,
    Textiles,
    Electronics,
    Machinery,
    Chemicals,
}

impl BusinessType {
    pub const ALL: [BusinessType; 6] = [
        BusinessType::GeneralManufacturing,
        BusinessType::Automotive,
        BusinessType::Textiles,
        BusinessType::Electronics,
        BusinessType::Machinery,
        BusinessType::Chemicals,
    ];

    /// Resolve a free-text industry name, accepting the aliases used on intake forms.
    pub fn resolve(raw: &str) -> Option<Self> {
        let key = raw
            .trim()
            .to_ascii_lowercase()
            .replace(['-', ' ', '&', '/'], "_");
        let key = key
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        match key.as_str() {
            "general_manufacturing" | "manufacturing" | "general" => {
                Some(Self::GeneralManufacturing)
            }
            "automotive" | "auto" | "automotive_parts" | "vehicles" => Some(Self::Automotive),
            "textiles" | "textile" | "apparel" | "clothing" | "textiles_apparel" => {
                Some(Self::Textiles)
            }
            "electronics" | "electronic" | "electrical" | "electronics_technology" => {
                Some(Self::Electronics)
            }
            "machinery" | "industrial_machinery" | "equipment" => Some(Self::Machinery),
            "chemicals" | "chemical" | "plastics" => Some(Self::Chemicals),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::GeneralManufacturing => "General Manufacturing",
            Self::Automotive => "Automotive",
            Self::Textiles => "Textiles",
            Self::Electronics => "Electronics",
            Self::Machinery => "Machinery",
            Self::Chemicals => "Chemicals",
        }
    }
}

/// Where the applied threshold came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    BusinessType,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationLevel {
    NotQualified,
    Qualified,
    HighlyQualified,
}

impl QualificationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotQualified => "Not Qualified",
            Self::Qualified => "Qualified",
            Self::HighlyQualified => "Highly Qualified",
        }
    }
}

/// Conditions that lower confidence in a result without invalidating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationWarning {
    PercentageSumMismatch { declared_total: f64, tolerance: f64 },
    UnknownBusinessType { value: String },
}

impl QualificationWarning {
    pub fn message(&self) -> String {
        match self {
            Self::PercentageSumMismatch {
                declared_total,
                tolerance,
            } => format!(
                "component percentages total {declared_total:.2}%, expected 100% (±{tolerance})"
            ),
            Self::UnknownBusinessType { value } => {
                format!("business type '{value}' is not recognized; default threshold applied")
            }
        }
    }
}

/// Per-component audit line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    pub description: String,
    pub origin_country: String,
    pub value_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usmca_member: Option<UsmcaMember>,
    pub is_usmca_member: bool,
}

/// Verdict of a regional value content evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationResult {
    pub usmca_content_percentage: f64,
    pub non_usmca_content_percentage: f64,
    pub declared_total_percentage: f64,
    pub required_threshold: f64,
    pub qualified: bool,
    pub margin: f64,
    pub qualification_level: QualificationLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<BusinessType>,
    pub threshold_source: ThresholdSource,
    pub low_confidence: bool,
    pub warnings: Vec<QualificationWarning>,
    pub reason: String,
    pub documentation_required: Vec<String>,
    pub component_breakdown: Vec<ComponentBreakdown>,
}

impl QualificationResult {
    pub fn summary(&self) -> String {
        let verdict = if self.qualified {
            "qualifies"
        } else {
            "does not qualify"
        };
        format!(
            "{verdict}: {:.1}% USMCA content against {:.1}% required (margin {:+.1})",
            self.usmca_content_percentage, self.required_threshold, self.margin
        )
    }
}
