//! Day table encoders.
//!
//! Both encoders emit columns in [`rides_core::RIDE_COLUMNS`] order. Parquet
//! is the primary format; CSV exists for eyeballing data without tooling.

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use rides_core::DayTable;

use crate::error::ExportError;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/parquet.rs"]
mod parquet;

pub use self::parquet::{build_record_batch, ride_schema, SCHEMA_VERSION_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parquet" => Ok(OutputFormat::Parquet),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format `{other}` (expected parquet or csv)")),
        }
    }
}

/// Encode a day table as Parquet bytes.
pub fn encode_parquet(table: &DayTable) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    parquet::write_parquet(table, &mut buffer)?;
    Ok(buffer)
}

/// Encode a day table as CSV bytes, header included.
pub fn encode_csv(table: &DayTable) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    csv::write_csv(table, &mut buffer)?;
    Ok(buffer)
}

pub fn encode(table: &DayTable, format: OutputFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        OutputFormat::Parquet => encode_parquet(table),
        OutputFormat::Csv => encode_csv(table),
    }
}

/// Write a day table to `path` in the given format.
pub fn write_day_file(table: &DayTable, format: OutputFormat, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match format {
        OutputFormat::Parquet => parquet::write_parquet(table, file),
        OutputFormat::Csv => csv::write_csv(table, file),
    }
}
