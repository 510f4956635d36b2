use serde::Deserialize;
use strum_macros::{Display, EnumString};

// --- Basic Types ---

/// Tilt axis reported by the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    X,
    Y,
}

/// One decoded measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Elapsed time since the reader started its clock (s)
    pub seconds: f64,
    /// Tilt about the X axis (deg)
    pub angle_x: f64,
    /// Tilt about the Y axis (deg)
    pub angle_y: f64,
}

impl Sample {
    pub fn new(seconds: f64, angle_x: f64, angle_y: f64) -> Self {
        Sample {
            seconds,
            angle_x,
            angle_y,
        }
    }

    pub fn angle(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.angle_x,
            Axis::Y => self.angle_y,
        }
    }
}

// --- Standard Error Type ---
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// Frame bytes did not match `X<sign>ddddY<sign>dddd`
    #[error("Level did not provide valid data. Check connection. (got \"{frame}\")")]
    InvalidData { frame: String },
    /// Error opening or configuring the serial channel
    #[error("Serial error: {0}")]
    Serial(#[from] serialport::Error),
    /// Error reading the channel or touching the log file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A log line that is not three whitespace separated floats
    #[error("Malformed log line {line}: {content:?}")]
    LogParse { line: usize, content: String },
    #[error("Configuration error: {0}")]
    Config(String),
    /// Failure inside the least-squares routine
    #[error("Fit error: {0}")]
    Fit(String),
    #[error("Plot error: {0}")]
    Plot(String),
}

impl LevelError {
    pub fn invalid_data(frame: &[u8]) -> Self {
        LevelError::InvalidData {
            frame: frame.escape_ascii().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LevelError>;

/// A pull-based stream of samples, e.g. a frame reader over a serial port.
pub trait SampleSource: Iterator<Item = Result<Sample>> {}

impl<T> SampleSource for T where T: Iterator<Item = Result<Sample>> {}
