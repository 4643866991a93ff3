//! Command-line driver for the ride dataset generator.
//!
//! [`Args`] is the flag surface; [`execute`] turns it into a [`RunPlan`],
//! resumes from the watermark file, runs the range and advances the
//! watermark.
//!
//! [`RunPlan`]: rides_core::RunPlan

mod cli;
pub mod logging;

pub use cli::{
    execute, Args, FormatArg, HolidayArg, LogFormat, OutputTarget, Report, SeedModeArg, SinkErrorArg,
};
