//! Capture tilt readings from a DXL360 digital level and estimate how fast
//! the measured angle drifts.
//!
//! Data only flows one way: the [`dxl360`] frame reader turns serial bytes into
//! samples, [`session`] bounds a run and writes it to a flat [`logfile`], and
//! [`drift`] fits a line to the logged angles.

pub mod config;
pub mod drift;
pub mod logfile;
#[cfg(feature = "plot")]
pub mod plot;
pub mod session;
pub mod telemetry;

pub use config::Config;
pub use drift::{analyze, polyfit1, DriftReport, LinearFit};
pub use dxl360::{FrameReader, PortConfig};
pub use level_traits::{Axis, LevelError, Result, Sample, SampleSource};
pub use session::{capture, measure, measure_from, Capture};
