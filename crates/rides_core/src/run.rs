//! Date-range execution: generate each day in order and hand it to a sink.
//!
//! In [`SeedMode::Sequential`] one generator is consumed day after day, so
//! reordering days changes the output. [`SeedMode::PerDay`] gives every day its
//! own stream keyed by the date, which makes days independent and lets them
//! be generated in parallel with rayon.

use std::error::Error;

use chrono::{Days, NaiveDate};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::catalog::CityCatalog;
use crate::day::build_day;
use crate::error::{ConfigError, GenerationError};
use crate::holidays::HolidayRegion;
use crate::record::DayTable;
use crate::rng::{day_stream, seeded};

/// Days generated per parallel batch in [`SeedMode::PerDay`].
const PARALLEL_CHUNK_DAYS: usize = 32;

/// Destination for finished day tables.
pub trait DaySink {
    /// Persist one day and return where it went.
    fn write_day(&mut self, table: &DayTable) -> Result<String, Box<dyn Error + Send + Sync>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// One generator stream shared by all days, in date order.
    #[default]
    Sequential,
    /// An independent stream per day derived from the seed and the date.
    PerDay,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SinkFailurePolicy {
    /// Stop the run at the first failed write.
    #[default]
    Abort,
    /// Log the failure and carry on with the next day.
    SkipDay,
}

/// Everything needed to generate a date range.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
    pub seed: u64,
    pub target_mean: f64,
    pub catalog: CityCatalog,
    pub region: HolidayRegion,
    pub seed_mode: SeedMode,
}

impl RunPlan {
    pub fn new(start: NaiveDate, end: NaiveDate, seed: u64, target_mean: f64, catalog: CityCatalog) -> Self {
        Self {
            start,
            end,
            seed,
            target_mean,
            catalog,
            region: HolidayRegion::default(),
            seed_mode: SeedMode::default(),
        }
    }

    pub fn with_region(mut self, region: HolidayRegion) -> Self {
        self.region = region;
        self
    }

    pub fn with_seed_mode(mut self, seed_mode: SeedMode) -> Self {
        self.seed_mode = seed_mode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_mean.is_finite() || self.target_mean <= 0.0 {
            return Err(ConfigError::InvalidMean(self.target_mean));
        }
        self.catalog.validate()
    }

    /// Dates from `start` through `end`; empty when `start > end`.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take_while(|d| *d <= self.end).collect()
    }
}

/// First day to generate: the day after the watermark when resuming,
/// otherwise `days_back` days ending at `end`.
pub fn resolve_start(
    resume_from: Option<NaiveDate>,
    end: NaiveDate,
    days_back: u32,
) -> Result<NaiveDate, ConfigError> {
    if let Some(last) = resume_from {
        return last
            .checked_add_days(Days::new(1))
            .ok_or_else(|| ConfigError::DateOutOfRange(format!("no day after watermark {last}")));
    }
    if days_back == 0 {
        return Err(ConfigError::ZeroDaysBack);
    }
    end.checked_sub_days(Days::new(u64::from(days_back) - 1))
        .ok_or_else(|| ConfigError::DateOutOfRange(format!("{days_back} days back from {end}")))
}

/// What happened to one day of the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    Written {
        date: NaiveDate,
        rows: usize,
        location: String,
    },
    /// Planned count was zero; nothing handed to the sink.
    Empty { date: NaiveDate },
    /// Sink failed under [`SinkFailurePolicy::SkipDay`].
    Skipped { date: NaiveDate, error: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub days_written: usize,
    pub rows_written: u64,
    /// Latest day that reached the sink successfully.
    pub last_generated: Option<NaiveDate>,
    pub empty_days: Vec<NaiveDate>,
    pub skipped_days: Vec<NaiveDate>,
}

impl RunSummary {
    fn record(&mut self, outcome: &DayOutcome) {
        match outcome {
            DayOutcome::Written { date, rows, .. } => {
                self.days_written += 1;
                self.rows_written += *rows as u64;
                self.last_generated = self.last_generated.max(Some(*date));
            }
            DayOutcome::Empty { date } => self.empty_days.push(*date),
            DayOutcome::Skipped { date, .. } => self.skipped_days.push(*date),
        }
    }
}

/// Watermark to persist after a run: the last generated day, or the previous
/// watermark when nothing was written.
pub fn next_watermark(previous: Option<NaiveDate>, summary: &RunSummary) -> Option<NaiveDate> {
    summary.last_generated.or(previous)
}

pub fn run<S: DaySink + ?Sized>(
    plan: &RunPlan,
    sink: &mut S,
    policy: SinkFailurePolicy,
) -> Result<RunSummary, GenerationError> {
    run_observed(plan, sink, policy, |_| {})
}

/// [`run`], calling `observe` after each day is settled.
pub fn run_observed<S, F>(
    plan: &RunPlan,
    sink: &mut S,
    policy: SinkFailurePolicy,
    mut observe: F,
) -> Result<RunSummary, GenerationError>
where
    S: DaySink + ?Sized,
    F: FnMut(&DayOutcome),
{
    plan.validate()?;
    let dates = plan.dates();
    let mut summary = RunSummary::default();

    let mut settle = |table: DayTable, summary: &mut RunSummary| -> Result<(), GenerationError> {
        let outcome = deliver(table, sink, policy)?;
        summary.record(&outcome);
        observe(&outcome);
        Ok(())
    };

    match plan.seed_mode {
        SeedMode::Sequential => {
            let mut rng = seeded(plan.seed);
            for date in dates {
                let table = build_day(&mut rng, date, plan.target_mean, &plan.catalog, plan.region)?;
                settle(table, &mut summary)?;
            }
        }
        SeedMode::PerDay => {
            for chunk in dates.chunks(PARALLEL_CHUNK_DAYS) {
                let tables: Vec<Result<DayTable, GenerationError>> = chunk
                    .par_iter()
                    .map(|&date| {
                        let mut rng = day_stream(plan.seed, date);
                        build_day(&mut rng, date, plan.target_mean, &plan.catalog, plan.region)
                    })
                    .collect();
                for table in tables {
                    settle(table?, &mut summary)?;
                }
            }
        }
    }

    info!(
        days = summary.days_written,
        rows = summary.rows_written,
        empty = summary.empty_days.len(),
        skipped = summary.skipped_days.len(),
        "run finished"
    );
    Ok(summary)
}

fn deliver<S: DaySink + ?Sized>(
    table: DayTable,
    sink: &mut S,
    policy: SinkFailurePolicy,
) -> Result<DayOutcome, GenerationError> {
    let date = table.date;
    if table.is_empty() {
        return Ok(DayOutcome::Empty { date });
    }
    match sink.write_day(&table) {
        Ok(location) => {
            info!(%date, rows = table.len(), %location, "wrote day");
            Ok(DayOutcome::Written {
                date,
                rows: table.len(),
                location,
            })
        }
        Err(source) => match policy {
            SinkFailurePolicy::Abort => Err(GenerationError::Sink { date, source }),
            SinkFailurePolicy::SkipDay => {
                warn!(%date, error = %source, "sink failed, skipping day");
                Ok(DayOutcome::Skipped {
                    date,
                    error: source.to_string(),
                })
            }
        },
    }
}
