use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::RegionRecord;

const INDENT: &[u8] = b"    ";

/// Stable sort by region id.
pub fn sort_records(records: &mut [RegionRecord]) {
    records.sort_by_key(|r| r.id);
}

/// Serializes records as a 4-space indented JSON array, non-ASCII text left as is.
pub fn to_json_string(records: &[RegionRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes the records to `path`, creating parent directories.
pub fn write_json(path: &Path, records: &[RegionRecord]) -> Result<()> {
    let json = to_json_string(records)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}
