use anyhow::Context;
use clap::Parser;
use level::{measure, telemetry, Config};
use std::path::PathBuf;

//* run by `cargo run --bin measure -- --duration 600` */

/// Sync to the level, capture for a fixed time and write the session log.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// TOML file with [device], [capture] and [analysis] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    device: Option<String>,

    #[arg(short, long)]
    baud: Option<u32>,

    /// Seconds to capture for
    #[arg(short = 't', long)]
    duration: Option<f64>,

    /// Where the session log is written (truncated)
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Skip the scatter plot once the log is written
    #[arg(long)]
    no_plot: bool,
}

fn main() -> anyhow::Result<()> {
    telemetry::init();
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(device) = args.device {
        config.device.path = device;
    }
    if let Some(baud) = args.baud {
        config.device.baud_rate = baud;
    }
    if let Some(duration) = args.duration {
        config.capture.duration_secs = duration;
    }
    if let Some(log) = args.log {
        config.capture.log_path = log;
    }
    config.validate()?;

    let run = measure(&config)
        .with_context(|| format!("Capture from {} failed", config.device.path))?;

    if args.no_plot {
        return Ok(());
    }

    #[cfg(feature = "plot")]
    level::plot::show_capture(&run)?;
    #[cfg(not(feature = "plot"))]
    tracing::info!("Built without the plot feature, {} samples not plotted", run.len());

    Ok(())
}
