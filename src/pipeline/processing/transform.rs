use csv::StringRecord;
use tracing::debug;

use super::schema::{BoundField, NumericPolicy, Schema};
use crate::error::{CapacityError, Result};
use crate::pipeline::ingestion::{RegionResolver, Resolution};
use crate::types::RegionRecord;

/// Parses a count such as `"1 234"` or `"-2 370"`; spaces are thousands separators.
pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.replace(' ', "").trim().parse().ok()
}

/// Parses a percentage such as `"30%"` into `30`.
pub fn parse_percentage(raw: &str) -> Option<i64> {
    raw.replace('%', "").trim().parse().ok()
}

impl NumericPolicy {
    pub fn parse(self, raw: &str) -> Option<i64> {
        match self {
            NumericPolicy::Integer | NumericPolicy::Summed => parse_integer(raw),
            NumericPolicy::Percentage => parse_percentage(raw),
        }
    }
}

/// What became of a single source row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Record(RegionRecord),
    Ignored,
    Unmapped { code: String },
}

/// Turns positional capacity rows into region records.
pub struct RowTransformer<'a> {
    schema: &'a Schema,
    resolver: &'a RegionResolver,
}

impl<'a> RowTransformer<'a> {
    pub fn new(schema: &'a Schema, resolver: &'a RegionResolver) -> Self {
        Self { schema, resolver }
    }

    /// Resolves the row's region first; cells of unmapped rows are never parsed.
    pub fn transform(&self, row: &StringRecord) -> Result<RowOutcome> {
        let code = row.get(self.schema.code_column).unwrap_or_default();

        let id = match self.resolver.resolve(code)? {
            Resolution::Orp(id) | Resolution::District(id) => id,
            Resolution::Ignored => {
                debug!("Ignoring row with sentinel code {:?}", code);
                return Ok(RowOutcome::Ignored);
            }
            Resolution::Unmapped => {
                return Ok(RowOutcome::Unmapped {
                    code: code.to_string(),
                })
            }
        };

        let mut record = RegionRecord::new(id, Some(code.to_string()));

        for group in &self.schema.sums {
            record.set(group.target, 0);
            for part in &group.parts {
                let value = cell_value(row, code, part)?;
                if record.add(group.target, value).is_none() {
                    return Err(CapacityError::InvalidNumber {
                        field: group.target.to_string(),
                        row: code.to_string(),
                        value: format!("sum overflows at {} = {}", part.name, value),
                    });
                }
            }
        }

        for field in &self.schema.fields {
            record.set(field.name, cell_value(row, code, field)?);
        }

        Ok(RowOutcome::Record(record))
    }
}

fn cell_value(row: &StringRecord, code: &str, field: &BoundField) -> Result<i64> {
    let raw = row
        .get(field.column)
        .ok_or_else(|| CapacityError::MissingField {
            field: field.name.to_string(),
            row: code.to_string(),
        })?;
    field
        .policy
        .parse(raw)
        .ok_or_else(|| CapacityError::InvalidNumber {
            field: field.name.to_string(),
            row: code.to_string(),
            value: raw.to_string(),
        })
}
