use anyhow::Context;
use clap::Parser;
use dxl360::{port, FrameReader, PortConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Stream DXL360 readings to stdout until the level stops making sense.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Serial device the level's UART bridge shows up as
    #[arg(short, long, default_value = port::DEFAULT_DEVICE)]
    device: String,

    #[arg(short, long, default_value_t = port::DEFAULT_BAUD_RATE)]
    baud: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = PortConfig::new(&args.device).with_baud_rate(args.baud);

    let reader = FrameReader::open(&config)
        .with_context(|| format!("Failed to open level on {}", config.path))?;
    info!("Listening on {}, press Ctrl+C to exit", config.path);

    // The reader tees each sample to stdout; we only need to keep pulling.
    for sample in reader {
        sample?;
    }
    Ok(())
}
