use clap::Parser;
use rides_cli::{execute, logging, Args};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.log_format)?;

    let today = chrono::Local::now().date_naive();
    let report = execute(&args, today)?;

    info!(
        rows = report.summary.rows_written,
        days = report.summary.days_written,
        watermark = ?report.watermark,
        "done"
    );
    Ok(())
}
