use anyhow::Context;
use clap::Parser;
use level::{analyze, logfile, telemetry, Axis, Config};
use std::path::PathBuf;
use tracing::info;

//* run by `cargo run --bin analyze -- --log data.txt` */

/// Fit angle against time from a session log and report the drift rate.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// TOML file with [device], [capture] and [analysis] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session log written by `measure`
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Which angle to fit (x or y)
    #[arg(short, long)]
    axis: Option<Axis>,

    /// Print the result without opening the plot window
    #[arg(long)]
    no_plot: bool,
}

fn main() -> anyhow::Result<()> {
    telemetry::init();
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(log) = args.log {
        config.capture.log_path = log;
    }
    if let Some(axis) = args.axis {
        config.analysis.axis = axis;
    }

    let log_path = &config.capture.log_path;
    let capture = logfile::read_log(log_path)
        .with_context(|| format!("Failed to read session log {}", log_path.display()))?;
    info!("Read {} samples from {}", capture.len(), log_path.display());

    let report = analyze(&capture, config.analysis.axis)?;
    info!(
        "Angle {} fit: slope {:.6} deg/s, intercept {:.4} deg",
        report.axis, report.fit.slope, report.fit.intercept
    );
    println!("{}", report);

    if args.no_plot {
        return Ok(());
    }

    #[cfg(feature = "plot")]
    level::plot::show_fit(&capture, &report)?;
    #[cfg(not(feature = "plot"))]
    info!("Built without the plot feature, skipping plot");

    Ok(())
}
