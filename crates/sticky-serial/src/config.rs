use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for opening a serial source.
///
/// Only what is needed to open the port and size reads; line settings
/// beyond the baud rate keep the driver defaults (8N1, no flow control).
///
/// # Example
///
/// ```
/// use sticky_serial::SerialConfig;
///
/// let config = SerialConfig {
///     path: "/dev/ttyS0".to_string(),
///     ..SerialConfig::default()
/// };
/// assert_eq!(config.baud_rate, 38400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM1`.
    pub path: String,

    /// Line speed in baud.
    pub baud_rate: u32,

    /// Read timeout in milliseconds. A timed-out read is not an error, it
    /// just gives the pump a chance to notice shutdown.
    pub timeout_ms: u64,

    /// Maximum bytes requested per read.
    pub read_chunk_size: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: "/dev/ttyUSB0".to_string(),
            baud_rate: 38400,
            timeout_ms: 100,
            read_chunk_size: 1024,
        }
    }
}

impl SerialConfig {
    /// Read timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
