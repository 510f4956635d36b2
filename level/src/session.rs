use crate::config::Config;
use crate::logfile;
use dxl360::FrameReader;
use level_traits::{Axis, Result, Sample, SampleSource};
use tracing::info;

/// One capture run, kept as parallel columns in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capture {
    pub time: Vec<f64>,
    pub angle_x: Vec<f64>,
    pub angle_y: Vec<f64>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        self.time.push(sample.seconds);
        self.angle_x.push(sample.angle_x);
        self.angle_y.push(sample.angle_y);
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn angles(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.angle_x,
            Axis::Y => &self.angle_y,
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.time
            .iter()
            .zip(&self.angle_x)
            .zip(&self.angle_y)
            .map(|((&t, &x), &y)| Sample::new(t, x, y))
    }
}

impl FromIterator<Sample> for Capture {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut capture = Capture::new();
        for sample in iter {
            capture.push(sample);
        }
        capture
    }
}

/// Pulls samples until one is older than `duration_secs`.
///
/// A sample at exactly `duration_secs` is kept, the first one past it is not.
/// The source is dropped on return, which closes a serial channel behind it.
pub fn capture<S: SampleSource>(source: S, duration_secs: f64) -> Result<Capture> {
    let mut run = Capture::new();
    for sample in source {
        let sample = sample?;
        if sample.seconds > duration_secs {
            break;
        }
        run.push(sample);
    }
    Ok(run)
}

/// Opens the level, captures for the configured duration and writes the log.
pub fn measure(config: &Config) -> Result<Capture> {
    let reader = FrameReader::open(&config.port_config())?;
    info!(
        "Capturing for {} s from {}",
        config.capture.duration_secs, config.device.path
    );
    measure_from(reader, config)
}

/// Captures from `source` and writes the configured log.
pub fn measure_from<S: SampleSource>(source: S, config: &Config) -> Result<Capture> {
    let run = capture(source, config.capture.duration_secs)?;
    let written = logfile::write_log(&config.capture.log_path, run.samples())?;
    info!(
        "Captured {} samples, wrote {} lines to {}",
        run.len(),
        written,
        config.capture.log_path.display()
    );
    Ok(run)
}
