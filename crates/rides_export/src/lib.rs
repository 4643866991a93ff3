//! Persistence for generated ride tables.
//!
//! - [`export`]: encode a [`rides_core::DayTable`] as Parquet or CSV
//! - [`sink`]: [`rides_core::run::DaySink`] implementations for a local
//!   partitioned directory tree and for dry runs
//! - [`state`]: the `KEY=VALUE` watermark file used to resume generation

pub mod error;
pub mod export;
pub mod sink;
pub mod state;

pub use error::{ExportError, StateError};
pub use export::OutputFormat;
pub use sink::{partition_path, DryRunSink, LocalSink};
pub use state::{load_watermark, store_watermark, EnvFile, LAST_DATE_KEY};
