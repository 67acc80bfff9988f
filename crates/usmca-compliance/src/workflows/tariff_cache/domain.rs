use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflows::numeric::DeclaredNumber;

/// Confidence levels a sync job may attach to a cached rate.
pub const CONFIDENCE_LEVELS: [u8; 7] = [0, 50, 75, 85, 90, 95, 100];

/// A text field as declared upstream; sync jobs sometimes write numbers or objects instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredText {
    Text(String),
    Other(Value),
}

impl DeclaredText {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DeclaredText::Text(text) => Some(text),
            DeclaredText::Other(_) => None,
        }
    }

    /// JSON type name of a non-text declaration, for issue messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DeclaredText::Text(_) => "string",
            DeclaredText::Other(Value::Number(_)) => "number",
            DeclaredText::Other(Value::Bool(_)) => "boolean",
            DeclaredText::Other(Value::Array(_)) => "array",
            DeclaredText::Other(Value::Object(_)) => "object",
            DeclaredText::Other(Value::Null) => "null",
            DeclaredText::Other(Value::String(_)) => "string",
        }
    }
}

impl From<&str> for DeclaredText {
    fn from(value: &str) -> Self {
        DeclaredText::Text(value.to_string())
    }
}

impl From<String> for DeclaredText {
    fn from(value: String) -> Self {
        DeclaredText::Text(value)
    }
}

impl fmt::Display for DeclaredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredText::Text(text) => f.write_str(text),
            DeclaredText::Other(value) => write!(f, "{value}"),
        }
    }
}

/// One cached tariff-rate fact for an HS code, as delivered by a sync job.
///
/// Fields are kept loosely typed so the gate can report exactly what was wrong with a row
/// instead of failing at deserialization. Fields outside the schema land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffCacheRecord {
    #[serde(default)]
    pub hs_code: Option<DeclaredText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_301: Option<DeclaredNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_232: Option<DeclaredNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfn_rate: Option<DeclaredNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usmca_rate: Option<DeclaredNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_mfn_rate: Option<DeclaredNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rate: Option<DeclaredNumber>,
    #[serde(default)]
    pub data_source: Option<DeclaredText>,
    #[serde(default)]
    pub verified_date: Option<DeclaredText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<DeclaredNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TariffCacheRecord {
    pub fn new(hs_code: impl Into<String>) -> Self {
        Self {
            hs_code: Some(DeclaredText::Text(hs_code.into())),
            ..Self::default()
        }
    }

    pub fn with_rate(mut self, field: RateField, value: impl Into<DeclaredNumber>) -> Self {
        *self.rate_slot(field) = Some(value.into());
        self
    }

    pub fn with_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(DeclaredText::Text(data_source.into()));
        self
    }

    pub fn verified_on(mut self, date: NaiveDate) -> Self {
        self.verified_date = Some(DeclaredText::Text(date.format("%Y-%m-%d").to_string()));
        self
    }

    pub fn with_confidence(mut self, confidence: impl Into<DeclaredNumber>) -> Self {
        self.confidence = Some(confidence.into());
        self
    }

    pub fn with_origin(mut self, origin_country: impl Into<String>) -> Self {
        self.origin_country = Some(origin_country.into());
        self
    }

    pub fn rate(&self, field: RateField) -> Option<&DeclaredNumber> {
        match field {
            RateField::Section301 => self.section_301.as_ref(),
            RateField::Section232 => self.section_232.as_ref(),
            RateField::MfnRate => self.mfn_rate.as_ref(),
            RateField::UsmcaRate => self.usmca_rate.as_ref(),
            RateField::BaseMfnRate => self.base_mfn_rate.as_ref(),
            RateField::TotalRate => self.total_rate.as_ref(),
        }
    }

    fn rate_slot(&mut self, field: RateField) -> &mut Option<DeclaredNumber> {
        match field {
            RateField::Section301 => &mut self.section_301,
            RateField::Section232 => &mut self.section_232,
            RateField::MfnRate => &mut self.mfn_rate,
            RateField::UsmcaRate => &mut self.usmca_rate,
            RateField::BaseMfnRate => &mut self.base_mfn_rate,
            RateField::TotalRate => &mut self.total_rate,
        }
    }

    /// Rate fields that are present, in a stable order.
    pub fn present_rates(&self) -> impl Iterator<Item = (RateField, &DeclaredNumber)> + '_ {
        RateField::ALL
            .into_iter()
            .filter_map(|field| self.rate(field).map(|value| (field, value)))
    }

    pub fn hs_code(&self) -> Option<&str> {
        self.hs_code.as_ref().and_then(DeclaredText::as_text)
    }

    pub fn data_source(&self) -> Option<&str> {
        self.data_source.as_ref().and_then(DeclaredText::as_text)
    }

    pub fn verified_date(&self) -> Option<&str> {
        self.verified_date.as_ref().and_then(DeclaredText::as_text)
    }

    pub fn hs_code_display(&self) -> String {
        self.hs_code
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "<missing>".to_string())
    }

    pub fn parsed_verified_date(&self) -> Option<NaiveDate> {
        self.verified_date().and_then(parse_verified_date)
    }

    pub fn is_china_origin(&self) -> bool {
        self.origin_country
            .as_deref()
            .map(|origin| {
                matches!(
                    origin.trim().to_ascii_uppercase().as_str(),
                    "CN" | "CHN" | "CHINA"
                )
            })
            .unwrap_or(false)
    }
}

/// Rate columns carried by a cache record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateField {
    Section301,
    Section232,
    MfnRate,
    UsmcaRate,
    BaseMfnRate,
    TotalRate,
}

impl RateField {
    pub const ALL: [RateField; 6] = [
        RateField::Section301,
        RateField::Section232,
        RateField::MfnRate,
        RateField::UsmcaRate,
        RateField::BaseMfnRate,
        RateField::TotalRate,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            RateField::Section301 => "section_301",
            RateField::Section232 => "section_232",
            RateField::MfnRate => "mfn_rate",
            RateField::UsmcaRate => "usmca_rate",
            RateField::BaseMfnRate => "base_mfn_rate",
            RateField::TotalRate => "total_rate",
        }
    }

    /// Whether an unrecognized column name would hold a rate.
    pub fn looks_like_rate(column: &str) -> bool {
        let column = column.trim().to_ascii_lowercase();
        column.ends_with("_rate") || column.starts_with("section_")
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and `YYYY-MM-DD HH:MM:SS`.
pub fn parse_verified_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// A record that passed the gate, in the shape the rate lookup table stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTariffRate {
    pub hs_code: String,
    pub section_301: Option<f64>,
    pub section_232: Option<f64>,
    pub mfn_rate: Option<f64>,
    pub usmca_rate: Option<f64>,
    #[serde(default)]
    pub base_mfn_rate: Option<f64>,
    #[serde(default)]
    pub total_rate: Option<f64>,
    pub data_source: String,
    pub verified_date: NaiveDate,
    pub confidence: Option<u8>,
    pub origin_country: Option<String>,
}

impl StoredTariffRate {
    /// Typed view of a record; `None` when a field would not survive the gate.
    pub fn from_validated(record: &TariffCacheRecord) -> Option<Self> {
        let strict = |value: Option<&DeclaredNumber>| match value {
            Some(number) => number.as_number().map(Some),
            None => Some(None),
        };

        let confidence = match record.confidence.as_ref() {
            Some(value) => value
                .as_number()
                .filter(|number| number.fract() == 0.0 && (0.0..=100.0).contains(number))
                .map(|number| number as u8),
            None => None,
        };

        Some(Self {
            hs_code: record.hs_code()?.trim().to_string(),
            section_301: strict(record.section_301.as_ref())?,
            section_232: strict(record.section_232.as_ref())?,
            mfn_rate: strict(record.mfn_rate.as_ref())?,
            usmca_rate: strict(record.usmca_rate.as_ref())?,
            base_mfn_rate: strict(record.base_mfn_rate.as_ref())?,
            total_rate: strict(record.total_rate.as_ref())?,
            data_source: record.data_source()?.trim().to_string(),
            verified_date: record.parsed_verified_date()?,
            confidence,
            origin_country: record.origin_country.clone(),
        })
    }
}

impl From<&StoredTariffRate> for TariffCacheRecord {
    fn from(rate: &StoredTariffRate) -> Self {
        Self {
            hs_code: Some(DeclaredText::from(rate.hs_code.as_str())),
            section_301: rate.section_301.map(DeclaredNumber::Number),
            section_232: rate.section_232.map(DeclaredNumber::Number),
            mfn_rate: rate.mfn_rate.map(DeclaredNumber::Number),
            usmca_rate: rate.usmca_rate.map(DeclaredNumber::Number),
            base_mfn_rate: rate.base_mfn_rate.map(DeclaredNumber::Number),
            total_rate: rate.total_rate.map(DeclaredNumber::Number),
            data_source: Some(DeclaredText::from(rate.data_source.as_str())),
            verified_date: Some(DeclaredText::Text(
                rate.verified_date.format("%Y-%m-%d").to_string(),
            )),
            confidence: rate
                .confidence
                .map(|value| DeclaredNumber::Number(f64::from(value))),
            origin_country: rate.origin_country.clone(),
            extra: BTreeMap::new(),
        }
    }
}
