//! Day sinks.
//!
//! [`LocalSink`] lays days out as `<root>/YYYY/MM/DD/rides.<ext>`, the same
//! partition layout a blob container would use. Rewriting a day replaces the
//! previous file.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use rides_core::run::DaySink;
use rides_core::DayTable;
use tracing::{debug, info};

use crate::error::ExportError;
use crate::export::{encode, write_day_file, OutputFormat};

const FILE_STEM: &str = "rides";

/// Relative partition path for `date`, e.g. `2024/03/05/rides.parquet`.
pub fn partition_path(date: NaiveDate, format: OutputFormat) -> PathBuf {
    PathBuf::from(format!("{:04}", date.year()))
        .join(format!("{:02}", date.month()))
        .join(format!("{:02}", date.day()))
        .join(format!("{FILE_STEM}.{}", format.extension()))
}

#[derive(Debug, Clone)]
pub struct LocalSink {
    root: PathBuf,
    format: OutputFormat,
}

impl LocalSink {
    pub fn new(root: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.root.join(partition_path(date, self.format))
    }

    /// Write one day and return the file path.
    pub fn write(&self, table: &DayTable) -> Result<PathBuf, ExportError> {
        let path = self.path_for(table.date);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ExportError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        write_day_file(table, self.format, &path)?;
        debug!(path = %path.display(), rows = table.len(), "day file written");
        Ok(path)
    }
}

impl DaySink for LocalSink {
    fn write_day(&mut self, table: &DayTable) -> Result<String, Box<dyn Error + Send + Sync>> {
        let path = self.write(table)?;
        Ok(path.display().to_string())
    }
}

/// Encodes every day but persists nothing; reports where it would have gone.
#[derive(Debug, Clone, Default)]
pub struct DryRunSink {
    format: OutputFormat,
    bytes_encoded: u64,
}

impl DryRunSink {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            bytes_encoded: 0,
        }
    }

    pub fn bytes_encoded(&self) -> u64 {
        self.bytes_encoded
    }
}

impl DaySink for DryRunSink {
    fn write_day(&mut self, table: &DayTable) -> Result<String, Box<dyn Error + Send + Sync>> {
        let bytes = encode(table, self.format)?;
        self.bytes_encoded += bytes.len() as u64;
        let location = format!("dry-run://{}", partition_path(table.date, self.format).display());
        info!(%location, bytes = bytes.len(), "dry run, nothing persisted");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_path_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            partition_path(date, OutputFormat::Parquet),
            PathBuf::from("2024/03/05/rides.parquet")
        );
        assert_eq!(
            partition_path(date, OutputFormat::Csv),
            PathBuf::from("2024/03/05/rides.csv")
        );
    }
}
