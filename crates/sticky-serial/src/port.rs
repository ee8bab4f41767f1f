use serialport::SerialPort;
use tracing::info;

use crate::config::SerialConfig;
use crate::error::{Result, SerialError};

/// Open the serial port described by `config`.
///
/// The returned port implements `std::io::Read` and can be handed straight
/// to [`FramePump::spawn`](crate::FramePump::spawn).
///
/// # Errors
/// Returns `SerialError::Open` if the device cannot be opened.
pub fn open_port(config: &SerialConfig) -> Result<Box<dyn SerialPort>> {
    let port = serialport::new(&config.path, config.baud_rate)
        .timeout(config.timeout())
        .open()
        .map_err(|e| SerialError::open(&config.path, e))?;

    info!(path = %config.path, baud_rate = config.baud_rate, "Port opened");
    Ok(port)
}
