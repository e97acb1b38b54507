// Pipeline ingestion: reading and decoding the CSV exports

pub mod codebook;
pub mod encoding;

use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{CapacityError, Result};

pub use codebook::{CodeMap, RegionResolver, Resolution};
pub use encoding::TextEncoding;

/// How a CSV export is laid out on disk.
#[derive(Debug, Clone, Copy)]
pub struct CsvFormat {
    pub delimiter: u8,
    pub encoding: TextEncoding,
    pub has_headers: bool,
}

impl CsvFormat {
    /// CZSO codebook: comma separated, cp1250, header row.
    pub const ORP_CODEBOOK: CsvFormat = CsvFormat {
        delimiter: b',',
        encoding: TextEncoding::Windows1250,
        has_headers: true,
    };

    /// Prague district codebook: semicolon separated, UTF-8 with BOM, header row.
    pub const DISTRICT_CODEBOOK: CsvFormat = CsvFormat {
        delimiter: b';',
        encoding: TextEncoding::Utf8Sig,
        has_headers: true,
    };

    /// Capacity export: semicolon separated, UTF-8 with BOM, rows mapped by position.
    pub const CAPACITIES: CsvFormat = CsvFormat {
        delimiter: b';',
        encoding: TextEncoding::Utf8Sig,
        has_headers: false,
    };

    pub fn reader<'a>(&self, text: &'a str) -> csv::Reader<&'a [u8]> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .flexible(true)
            .from_reader(text.as_bytes())
    }
}

/// Reads a whole file and decodes it. Undecodable bytes are replaced, not fatal.
pub fn read_text(path: &Path, encoding: TextEncoding) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| CapacityError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = encoding.decode(&bytes);
    if decoded.had_errors {
        warn!(
            "{} contains bytes that are not valid {:?}; replaced them",
            path.display(),
            encoding
        );
    }
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(decoded.text.into_owned())
}

/// Loads the capacity export as raw positional rows.
pub fn load_capacity_rows(path: &Path) -> Result<Vec<StringRecord>> {
    let text = read_text(path, CsvFormat::CAPACITIES.encoding)?;
    parse_capacity_rows(&text)
}

pub fn parse_capacity_rows(text: &str) -> Result<Vec<StringRecord>> {
    let mut reader = CsvFormat::CAPACITIES.reader(text);
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?);
    }
    Ok(rows)
}
