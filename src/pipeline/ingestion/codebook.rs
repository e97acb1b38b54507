use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::{read_text, CsvFormat};
use crate::constants::{
    CODEBOOK_KEY_COLUMN, CODEBOOK_VALUE_COLUMN, DISTRICT_ID_PREFIX, IGNORED_REGION_CODE,
};
use crate::error::{CapacityError, Result};
use crate::types::RegionId;

/// Source code → RUIAN code, as read from a codebook export.
#[derive(Debug, Clone, Default)]
pub struct CodeMap {
    entries: HashMap<String, String>,
}

impl CodeMap {
    pub fn load(path: &Path, format: CsvFormat) -> Result<Self> {
        let text = read_text(path, format.encoding)?;
        let map = Self::from_csv(&text, format, &path.display().to_string())?;
        info!("Loaded {} codes from {}", map.len(), path.display());
        Ok(map)
    }

    /// Builds the map from the `CHODNOTA` and `KOD_RUIAN` header columns. Later rows win.
    pub fn from_csv(text: &str, format: CsvFormat, table: &str) -> Result<Self> {
        let mut reader = format.reader(text);
        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CapacityError::MissingColumn {
                    table: table.to_string(),
                    column: name.to_string(),
                })
        };
        let key_idx = column(CODEBOOK_KEY_COLUMN)?;
        let value_idx = column(CODEBOOK_VALUE_COLUMN)?;

        let mut entries = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let Some(key) = record.get(key_idx) else {
                continue;
            };
            let value = record.get(value_idx).unwrap_or_default();
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(Self { entries })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of looking up a source row's region code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Orp(RegionId),
    District(RegionId),
    /// The explicitly ignored city-wide row.
    Ignored,
    Unmapped,
}

/// Resolves source row codes through the ORP map first, then the Prague district map.
#[derive(Debug, Clone, Default)]
pub struct RegionResolver {
    orp: CodeMap,
    districts: CodeMap,
}

impl RegionResolver {
    pub fn new(orp: CodeMap, districts: CodeMap) -> Self {
        Self { orp, districts }
    }

    pub fn resolve(&self, code: &str) -> Result<Resolution> {
        if code == IGNORED_REGION_CODE {
            return Ok(Resolution::Ignored);
        }
        if let Some(ruian) = self.orp.get(code) {
            return parse_region_id(code, ruian).map(Resolution::Orp);
        }
        if let Some(ruian) = self.districts.get(code) {
            let prefixed = format!("{}{}", DISTRICT_ID_PREFIX, ruian.trim());
            return parse_region_id(code, &prefixed).map(Resolution::District);
        }
        debug!("No RUIAN code for source code {:?}", code);
        Ok(Resolution::Unmapped)
    }
}

fn parse_region_id(code: &str, ruian: &str) -> Result<RegionId> {
    ruian
        .trim()
        .parse()
        .map_err(|_| CapacityError::InvalidNumber {
            field: CODEBOOK_VALUE_COLUMN.to_string(),
            row: code.to_string(),
            value: ruian.to_string(),
        })
}
