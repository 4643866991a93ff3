use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rides_core::catalog::CityCatalog;
use rides_core::holidays::HolidayRegion;
use rides_core::run::{next_watermark, resolve_start, run_observed, DayOutcome};
use rides_core::{ConfigError, DaySink, RunPlan, RunSummary, SeedMode, SinkFailurePolicy};
use rides_export::{load_watermark, store_watermark, DryRunSink, LocalSink, OutputFormat};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "rides",
    about = "Generate synthetic ride-hailing data, one partition per day",
    long_about = "Generates a reproducible synthetic ride-hailing dataset.\n\
                  Resumes from the LAST_DATE watermark in the state file unless\n\
                  --ignore-state is given, otherwise backfills --days days."
)]
pub struct Args {
    /// Days back from the end date when there is no watermark
    #[arg(long, env = "RIDES_DAYS", default_value_t = 365)]
    pub days: u32,

    /// Inclusive last date to generate (YYYY-MM-DD), defaults to today
    #[arg(long, env = "RIDES_END_DATE")]
    pub end_date: Option<NaiveDate>,

    /// Generator seed
    #[arg(long, env = "RIDES_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Weekday mean rides per day before seasonal, weekend and holiday multipliers
    #[arg(long, env = "RIDES_MEAN", default_value_t = 1200.0)]
    pub mean: f64,

    #[arg(long, env = "RIDES_OUT", value_enum, default_value_t = OutputTarget::Local)]
    pub out: OutputTarget,

    /// Root directory for --out local
    #[arg(long, env = "RIDES_ROOT", default_value = "./lake/raw/uberides")]
    pub root: PathBuf,

    #[arg(long, env = "RIDES_FORMAT", value_enum, default_value_t = FormatArg::Parquet)]
    pub format: FormatArg,

    /// KEY=VALUE file holding LAST_DATE
    #[arg(long, env = "RIDES_STATE_FILE", default_value = ".uberides.env")]
    pub state_file: PathBuf,

    /// Neither read nor write the watermark
    #[arg(long, env = "RIDES_IGNORE_STATE")]
    pub ignore_state: bool,

    /// JSON city catalog replacing the built-in one
    #[arg(long, env = "RIDES_CITIES")]
    pub cities: Option<PathBuf>,

    /// Restrict generation to a single catalog city
    #[arg(long, env = "RIDES_ONLY_CITY")]
    pub only_city: Option<String>,

    #[arg(long, env = "RIDES_HOLIDAYS", value_enum, default_value_t = HolidayArg::Us)]
    pub holidays: HolidayArg,

    #[arg(long, env = "RIDES_SEED_MODE", value_enum, default_value_t = SeedModeArg::Sequential)]
    pub seed_mode: SeedModeArg,

    #[arg(long, env = "RIDES_ON_SINK_ERROR", value_enum, default_value_t = SinkErrorArg::Abort)]
    pub on_sink_error: SinkErrorArg,

    #[arg(long, env = "RIDES_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Hide the per-day progress bar
    #[arg(long, env = "RIDES_NO_PROGRESS")]
    pub no_progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputTarget {
    /// Partitioned files under --root
    Local,
    /// Encode every day but write nothing
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Parquet,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Parquet => OutputFormat::Parquet,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HolidayArg {
    /// US federal holidays
    Us,
    /// No holiday boost
    #[value(name = "none")]
    Off,
}

impl From<HolidayArg> for HolidayRegion {
    fn from(value: HolidayArg) -> Self {
        match value {
            HolidayArg::Us => HolidayRegion::UnitedStates,
            HolidayArg::Off => HolidayRegion::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeedModeArg {
    /// One stream across the whole range
    Sequential,
    /// Independent stream per date, generated in parallel
    PerDay,
}

impl From<SeedModeArg> for SeedMode {
    fn from(value: SeedModeArg) -> Self {
        match value {
            SeedModeArg::Sequential => SeedMode::Sequential,
            SeedModeArg::PerDay => SeedMode::PerDay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkErrorArg {
    Abort,
    Skip,
}

impl From<SinkErrorArg> for SinkFailurePolicy {
    fn from(value: SinkErrorArg) -> Self {
        match value {
            SinkErrorArg::Abort => SinkFailurePolicy::Abort,
            SinkErrorArg::Skip => SinkFailurePolicy::SkipDay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Args {
    pub fn catalog(&self) -> Result<CityCatalog, ConfigError> {
        let catalog = match &self.cities {
            Some(path) => CityCatalog::from_json_file(path)?,
            None => CityCatalog::default(),
        };
        match &self.only_city {
            Some(name) => catalog.only(name),
            None => Ok(catalog),
        }
    }

    /// Validated plan ending at `--end-date` (or `today`), starting after
    /// `watermark` when there is one.
    pub fn plan(&self, today: NaiveDate, watermark: Option<NaiveDate>) -> Result<RunPlan, ConfigError> {
        let end = self.end_date.unwrap_or(today);
        let start = resolve_start(watermark, end, self.days)?;
        let plan = RunPlan::new(start, end, self.seed, self.mean, self.catalog()?)
            .with_region(self.holidays.into())
            .with_seed_mode(self.seed_mode.into());
        plan.validate()?;
        Ok(plan)
    }

    fn uses_state(&self) -> bool {
        !self.ignore_state && self.out == OutputTarget::Local
    }
}

/// Outcome of [`execute`].
#[derive(Debug, Clone)]
pub struct Report {
    pub plan: RunPlan,
    pub summary: RunSummary,
    /// Watermark after the run; `None` when state is not tracked or no day
    /// has ever been generated.
    pub watermark: Option<NaiveDate>,
}

/// Run the whole command: resume, generate, write, advance the watermark.
///
/// Dry runs neither read nor advance the watermark since nothing is
/// persisted.
pub fn execute(args: &Args, today: NaiveDate) -> anyhow::Result<Report> {
    let previous = if args.uses_state() {
        load_watermark(&args.state_file)
            .with_context(|| format!("reading watermark from {}", args.state_file.display()))?
    } else {
        None
    };
    if let Some(last) = previous {
        info!(%last, state_file = %args.state_file.display(), "resuming after watermark");
    }

    let plan = args.plan(today, previous).context("invalid configuration")?;
    let total_days = plan.dates().len();
    info!(
        start = %plan.start,
        end = %plan.end,
        days = total_days,
        cities = plan.catalog.len(),
        seed = plan.seed,
        mean = plan.target_mean,
        "starting generation"
    );

    let mut sink: Box<dyn DaySink> = match args.out {
        OutputTarget::Local => Box::new(LocalSink::new(&args.root, args.format.into())),
        OutputTarget::DryRun => Box::new(DryRunSink::new(args.format.into())),
    };

    let progress = progress_bar(total_days as u64, !args.no_progress)?;
    let summary = run_observed(&plan, sink.as_mut(), args.on_sink_error.into(), |outcome| {
        if let DayOutcome::Skipped { date, error } = outcome {
            progress.suspend(|| warn!(%date, %error, "day skipped"));
        }
        progress.inc(1);
    })
    .with_context(|| format!("generating {}..={}", plan.start, plan.end))?;
    progress.finish_and_clear();

    let watermark = if args.uses_state() {
        let next = next_watermark(previous, &summary);
        if let Some(date) = next {
            store_watermark(&args.state_file, date)
                .with_context(|| format!("writing watermark to {}", args.state_file.display()))?;
        }
        next
    } else {
        None
    };

    Ok(Report {
        plan,
        summary,
        watermark,
    })
}

fn progress_bar(total: u64, visible: bool) -> anyhow::Result<ProgressBar> {
    if !visible || total == 0 {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn defaults_mirror_backfill_settings() {
        let args = Args::parse_from(["rides"]);
        assert_eq!(args.days, 365);
        assert_eq!(args.seed, 42);
        assert_eq!(args.mean, 1200.0);
        assert_eq!(args.out, OutputTarget::Local);
        assert_eq!(args.root, PathBuf::from("./lake/raw/uberides"));
        assert_eq!(args.format, FormatArg::Parquet);
        assert_eq!(args.state_file, PathBuf::from(".uberides.env"));
        assert!(!args.ignore_state);
        assert_eq!(args.holidays, HolidayArg::Us);
        assert_eq!(args.seed_mode, SeedModeArg::Sequential);
        assert_eq!(args.on_sink_error, SinkErrorArg::Abort);
    }

    #[test]
    fn value_names_are_kebab_case() {
        let args = Args::parse_from([
            "rides",
            "--out",
            "dry-run",
            "--seed-mode",
            "per-day",
            "--holidays",
            "none",
            "--on-sink-error",
            "skip",
            "--end-date",
            "2024-03-05",
        ]);
        assert_eq!(args.out, OutputTarget::DryRun);
        assert_eq!(args.seed_mode, SeedModeArg::PerDay);
        assert_eq!(args.holidays, HolidayArg::Off);
        assert_eq!(args.on_sink_error, SinkErrorArg::Skip);
        assert_eq!(args.end_date, Some(d(2024, 3, 5)));
    }

    #[test]
    fn plan_backfills_days_ending_today() {
        let args = Args::parse_from(["rides", "--days", "7"]);
        let plan = args.plan(d(2024, 1, 7), None).unwrap();
        assert_eq!(plan.start, d(2024, 1, 1));
        assert_eq!(plan.end, d(2024, 1, 7));
    }

    #[test]
    fn plan_rejects_bad_mean_and_unknown_city() {
        let args = Args::parse_from(["rides", "--mean", "0"]);
        assert_eq!(args.plan(d(2024, 1, 7), None).unwrap_err(), ConfigError::InvalidMean(0.0));
        let args = Args::parse_from(["rides", "--only-city", "Gotham"]);
        assert!(matches!(
            args.plan(d(2024, 1, 7), None),
            Err(ConfigError::UnknownCity(_))
        ));
    }

    #[test]
    fn plan_rejects_out_of_range_backfill() {
        let args = Args::parse_from(["rides", "--days", "4294967295"]);
        assert!(matches!(
            args.plan(d(2024, 1, 7), None),
            Err(ConfigError::DateOutOfRange(_))
        ));
    }

    #[test]
    fn dry_run_does_not_track_state() {
        let args = Args::parse_from(["rides", "--out", "dry-run"]);
        assert!(!args.uses_state());
        let args = Args::parse_from(["rides", "--ignore-state"]);
        assert!(!args.uses_state());
    }
}
