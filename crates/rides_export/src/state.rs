//! `.env`-style watermark file.
//!
//! `KEY=VALUE` per line; blank lines, `#` comments and lines without `=` are
//! ignored on read. Keys other than [`LAST_DATE_KEY`] survive a rewrite in
//! their original order.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::StateError;

pub const LAST_DATE_KEY: &str = "LAST_DATE";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
}

impl EnvFile {
    pub fn parse(contents: &str) -> Self {
        let mut file = Self::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                file.set(key.trim(), value.trim());
            }
        }
        file
    }

    /// Read `path`; a missing file is an empty mapping.
    pub fn read(path: &Path) -> Result<Self, StateError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(StateError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), StateError> {
        fs::write(path, self.render()).map_err(|source| StateError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn render(&self) -> String {
        self.entries.iter().map(|(k, v)| format!("{k}={v}\n")).collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }
}

/// Last successfully generated date recorded in `path`, if any.
pub fn load_watermark(path: &Path) -> Result<Option<NaiveDate>, StateError> {
    let file = EnvFile::read(path)?;
    match file.get(LAST_DATE_KEY) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|_| StateError::MalformedDate {
                path: PathBuf::from(path),
                key: LAST_DATE_KEY,
                value: value.to_string(),
            }),
    }
}

/// Record `date` as the watermark, keeping any other keys in the file.
pub fn store_watermark(path: &Path, date: NaiveDate) -> Result<(), StateError> {
    let mut file = EnvFile::read(path)?;
    file.set(LAST_DATE_KEY, &date.format(DATE_FORMAT).to_string());
    file.write(path)
}
