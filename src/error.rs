use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CapacityError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Column '{column}' not found in {table}")]
    MissingColumn { table: String, column: String },

    #[error("Missing required field '{field}' in row '{row}'")]
    MissingField { field: String, row: String },

    #[error("Invalid number in field '{field}' of row '{row}': {value:?}")]
    InvalidNumber {
        field: String,
        row: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, CapacityError>;
