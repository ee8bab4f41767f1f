//! File-based configuration for the `sticky` binary.
//!
//! ```json
//! {
//!   "decoder": { "header_match": "contiguous", "max_residual_size": 65536 },
//!   "serial": { "path": "/dev/ttyUSB0", "baud_rate": 38400 }
//! }
//! ```
//!
//! Every field is optional. Command-line flags override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use sticky_core::DecoderConfig;
use sticky_serial::SerialConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub decoder: DecoderConfig,
    pub serial: SerialConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.decoder.validate()?;
        Ok(config)
    }
}
