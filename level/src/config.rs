use dxl360::{port, PortConfig};
use level_traits::{Axis, LevelError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DURATION_SECS: f64 = 20.0;
pub const DEFAULT_LOG_PATH: &str = "data.txt";

/// Settings resolved once at startup: defaults, then an optional TOML file,
/// then command line flags.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub device: DeviceConfig,
    pub capture: CaptureConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    pub path: String,
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: port::DEFAULT_DEVICE.to_string(),
            baud_rate: port::DEFAULT_BAUD_RATE,
            timeout_ms: port::DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Capture stops once a sample is older than this
    pub duration_secs: f64,
    pub log_path: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub axis: Axis,
}

impl Config {
    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    LevelError::Config(format!("failed to read {}: {}", path.display(), e))
                })?;
                Self::from_toml_str(&text)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| LevelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.device.path.is_empty() {
            return Err(LevelError::Config("device.path is empty".to_string()));
        }
        if self.device.baud_rate == 0 {
            return Err(LevelError::Config("device.baud_rate must be positive".to_string()));
        }
        if self.device.timeout_ms == 0 {
            return Err(LevelError::Config("device.timeout_ms must be positive".to_string()));
        }
        if !self.capture.duration_secs.is_finite() || self.capture.duration_secs < 0.0 {
            return Err(LevelError::Config(format!(
                "capture.duration_secs must be a non-negative number, got {}",
                self.capture.duration_secs
            )));
        }
        Ok(())
    }

    pub fn port_config(&self) -> PortConfig {
        PortConfig::new(&self.device.path)
            .with_baud_rate(self.device.baud_rate)
            .with_timeout(Duration::from_millis(self.device.timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.device.path, "/dev/ttyUSB0");
        assert_eq!(config.device.baud_rate, 9600);
        assert_eq!(config.device.timeout_ms, 1000);
        assert_eq!(config.capture.duration_secs, 20.0);
        assert_eq!(config.capture.log_path, PathBuf::from("data.txt"));
        assert_eq!(config.analysis.axis, Axis::X);
        assert_eq!(config.port_config(), PortConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [capture]
            duration_secs = 600.0

            [analysis]
            axis = "y"
            "#,
        )
        .unwrap();
        assert_eq!(config.capture.duration_secs, 600.0);
        assert_eq!(config.capture.log_path, PathBuf::from("data.txt"));
        assert_eq!(config.analysis.axis, Axis::Y);
        assert_eq!(config.device, DeviceConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_toml_str("[capture]\nduration_secs = -1.0"),
            Err(LevelError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[device]\nbaud_rate = 0"),
            Err(LevelError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[device]\nparity = \"odd\""),
            Err(LevelError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[device]\npath = \"/dev/ttyACM1\"\ntimeout_ms = 250").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        let port = config.port_config();
        assert_eq!(port.path, "/dev/ttyACM1");
        assert_eq!(port.baud_rate, 9600);
        assert_eq!(port.timeout, Duration::from_millis(250));

        assert!(matches!(
            Config::load(Some(Path::new("/nonexistent/level.toml"))),
            Err(LevelError::Config(_))
        ));
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
