//! Synthetic ride-hailing dataset generator.
//!
//! Produces one day of internally consistent ride records at a time across a
//! catalog of cities. Every random draw goes through a single explicitly passed
//! generator ([`rng::RideRng`]), so a seed reproduces the same dataset.
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use rides_core::catalog::CityCatalog;
//! use rides_core::day::build_day;
//! use rides_core::holidays::HolidayRegion;
//! use rides_core::rng::seeded;
//!
//! let catalog = CityCatalog::default();
//! let mut rng = seeded(42);
//! let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
//! let table = build_day(&mut rng, date, 1200.0, &catalog, HolidayRegion::UnitedStates).unwrap();
//! println!("{} rides on {}", table.len(), table.date);
//! ```
//!
//! # Architecture
//!
//! - [`catalog`]: static city reference data
//! - [`context`]: weather, traffic and surge per ride
//! - [`volume`]: daily ride count and the split across cities
//! - [`attributes`]: per-ride geography, timing, status and metadata
//! - [`pricing`]: fare and driver earnings
//! - [`day`]: assembles a full day table
//! - [`run`]: drives a date range into a [`run::DaySink`]

pub mod attributes;
pub mod catalog;
pub mod context;
pub mod day;
pub mod distributions;
pub mod error;
pub mod holidays;
pub mod patterns;
pub mod pricing;
pub mod record;
pub mod rng;
pub mod run;
pub mod volume;

pub use catalog::{City, CityCatalog};
pub use day::{build_day, DayContext};
pub use error::{ConfigError, GenerationError, SamplingError};
pub use record::{DayTable, RideRecord, RIDE_COLUMNS, SCHEMA_VERSION};
pub use run::{run, DaySink, RunPlan, RunSummary, SeedMode, SinkFailurePolicy};
