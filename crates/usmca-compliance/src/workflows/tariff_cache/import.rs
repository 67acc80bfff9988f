use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::workflows::numeric::DeclaredNumber;

use super::domain::{DeclaredText, TariffCacheRecord};

const KNOWN_COLUMNS: [&str; 11] = [
    "hs_code",
    "section_301",
    "section_232",
    "mfn_rate",
    "usmca_rate",
    "base_mfn_rate",
    "total_rate",
    "data_source",
    "verified_date",
    "confidence",
    "origin_country",
];

#[derive(Debug)]
pub enum TariffImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for TariffImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TariffImportError::Io(err) => write!(f, "failed to read tariff cache export: {}", err),
            TariffImportError::Csv(err) => write!(f, "invalid tariff cache CSV data: {}", err),
        }
    }
}

impl std::error::Error for TariffImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TariffImportError::Io(err) => Some(err),
            TariffImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TariffImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TariffImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Load a tariff cache export. Cells are kept as written; the validator judges them.
///
/// Non-blank cells under columns the cache does not model are carried in `extra` so the
/// gate can report them.
pub fn import_records_from_path(
    path: impl AsRef<Path>,
) -> Result<Vec<TariffCacheRecord>, TariffImportError> {
    let file = File::open(path)?;
    import_records(file)
}

pub fn import_records<R: Read>(reader: R) -> Result<Vec<TariffCacheRecord>, TariffImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let extra_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty() && !KNOWN_COLUMNS.contains(name))
        .collect();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let mut record = row.deserialize::<TariffRow>(Some(&headers))?.into_record();
        for (index, name) in &extra_columns {
            if let Some(cell) = row.get(*index).filter(|cell| !cell.is_empty()) {
                record
                    .extra
                    .insert(name.to_string(), Value::String(cell.to_string()));
            }
        }
        records.push(record);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct TariffRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    hs_code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    section_301: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    section_232: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    mfn_rate: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    usmca_rate: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    base_mfn_rate: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    total_rate: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    data_source: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    verified_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    confidence: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    origin_country: Option<String>,
}

impl TariffRow {
    fn into_record(self) -> TariffCacheRecord {
        let number = |cell: Option<String>| cell.as_deref().map(DeclaredNumber::from_cell);
        TariffCacheRecord {
            section_301: number(self.section_301),
            section_232: number(self.section_232),
            mfn_rate: number(self.mfn_rate),
            usmca_rate: number(self.usmca_rate),
            base_mfn_rate: number(self.base_mfn_rate),
            total_rate: number(self.total_rate),
            confidence: number(self.confidence),
            hs_code: self.hs_code.map(DeclaredText::Text),
            data_source: self.data_source.map(DeclaredText::Text),
            verified_date: self.verified_date.map(DeclaredText::Text),
            origin_country: self.origin_country,
            extra: Default::default(),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
