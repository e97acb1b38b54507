use serde::Serialize;
use serde_json::{Map, Value};

/// RUIAN region code, the canonical identifier of an output record.
pub type RegionId = i64;

/// One output record: a region id plus its named numeric fields in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRecord {
    pub id: RegionId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Code of the source row this record came from; `None` for injected records.
    #[serde(skip)]
    pub source_code: Option<String>,
}

impl RegionRecord {
    pub fn new(id: RegionId, source_code: Option<String>) -> Self {
        Self {
            id,
            fields: Map::new(),
            source_code,
        }
    }

    /// Sets a field, keeping its original position if it already exists.
    pub fn set(&mut self, name: &str, value: i64) {
        self.fields.insert(name.to_string(), Value::from(value));
    }

    /// Adds to a field, creating it at zero first if absent.
    ///
    /// Returns the new total, or `None` (leaving the field untouched) on overflow.
    pub fn add(&mut self, name: &str, value: i64) -> Option<i64> {
        let total = self.get(name).unwrap_or(0).checked_add(value)?;
        self.set(name, total);
        Some(total)
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }
}
