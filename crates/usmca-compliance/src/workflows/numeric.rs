use serde::{Deserialize, Serialize};
use std::fmt;

/// A value declared by a form, import file, or sync job that ought to be a number.
///
/// Upstream sources are loosely typed: spreadsheets and form posts deliver numbers as
/// strings, and sync jobs have historically written strings into numeric columns. Keeping
/// the raw text lets the caller decide whether text is acceptable or a type error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredNumber {
    Number(f64),
    Text(String),
}

impl DeclaredNumber {
    /// Numeric value when the declaration is a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DeclaredNumber::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    /// Numeric value, also accepting text that parses cleanly (`" 62.5 "`, `"40%"`).
    pub fn parse_lenient(&self) -> Option<f64> {
        match self {
            DeclaredNumber::Number(_) => self.as_number(),
            DeclaredNumber::Text(raw) => {
                let trimmed = raw.trim();
                let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
            }
        }
    }

    /// Interpret a CSV cell: numbers become `Number`, anything else stays `Text`.
    pub fn from_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => DeclaredNumber::Number(value),
            _ => DeclaredNumber::Text(trimmed.to_string()),
        }
    }
}

impl From<f64> for DeclaredNumber {
    fn from(value: f64) -> Self {
        DeclaredNumber::Number(value)
    }
}

impl From<&str> for DeclaredNumber {
    fn from(value: &str) -> Self {
        DeclaredNumber::Text(value.to_string())
    }
}

impl fmt::Display for DeclaredNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredNumber::Number(value) => write!(f, "{value}"),
            DeclaredNumber::Text(raw) => write!(f, "\"{raw}\""),
        }
    }
}
