use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Serial settings for the level's UART bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct PortConfig {
    pub path: String,
    pub baud_rate: u32,
    /// Bound on each individual read
    pub timeout: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DEVICE.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PortConfig {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Opens the port 8N1 with no flow control. The level only talks, so nothing
/// is ever written back.
pub fn open(config: &PortConfig) -> Result<Box<dyn SerialPort>, serialport::Error> {
    let port = serialport::new(&config.path, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(config.timeout)
        .open()?;
    info!(
        "Opened port: {} at {} baud ({:?} read timeout)",
        config.path, config.baud_rate, config.timeout
    );
    Ok(port)
}
