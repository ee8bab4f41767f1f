//! Decoder configuration.
//!
//! [`DecoderConfig`] is plain data: it can be built in code, deserialized from
//! JSON, or assembled from command-line flags. Call [`DecoderConfig::validate`]
//! before handing it to an assembler.
//!
//! ```
//! use sticky_core::{DecoderConfig, HeaderMatch, OverflowPolicy};
//!
//! let config: DecoderConfig = serde_json::from_str(
//!     r#"{ "header_match": "compat", "max_residual_size": 4096 }"#,
//! ).unwrap();
//!
//! assert_eq!(config.header_match, HeaderMatch::Compat);
//! assert_eq!(config.overflow_policy, OverflowPolicy::DropOldest);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_MAX_RESIDUAL_SIZE, MAX_FRAME_SIZE};
use crate::error::{Error, Result};

/// How candidate headers are located in the residual buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatch {
    /// Header bytes must be adjacent.
    #[default]
    Contiguous,

    /// Legacy matching: each header byte is searched independently after the
    /// previous one, so the markers need not be adjacent.
    ///
    /// Close to the legacy desktop tool's matcher, false positives included.
    /// A start computed before the scan cursor is clamped to the cursor,
    /// where the legacy tool returned that earlier position (or no header
    /// when `BB` sat at index 0).
    ///
    /// As in the legacy tool, a missing first marker is skipped rather than
    /// failing the search, so results depend on where chunk boundaries fall.
    ///
    /// Only use it to compare against captures produced by that tool.
    Compat,
}

impl fmt::Display for HeaderMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderMatch::Contiguous => write!(f, "contiguous"),
            HeaderMatch::Compat => write!(f, "compat"),
        }
    }
}

/// What to do when unresolved bytes exceed `max_residual_size`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the newest `max_residual_size` bytes.
    #[default]
    DropOldest,

    /// Discard the whole residual buffer.
    Reset,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropOldest => write!(f, "drop_oldest"),
            OverflowPolicy::Reset => write!(f, "reset"),
        }
    }
}

/// Configuration for one frame assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Header location strategy.
    pub header_match: HeaderMatch,

    /// Maximum number of bytes retained between `ingest` calls.
    pub max_residual_size: usize,

    /// Policy applied when the residual buffer grows past `max_residual_size`.
    pub overflow_policy: OverflowPolicy,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            header_match: HeaderMatch::default(),
            max_residual_size: DEFAULT_MAX_RESIDUAL_SIZE,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl DecoderConfig {
    /// Check that the configuration can decode every legal frame.
    ///
    /// # Errors
    /// Returns `Error::Config` if `max_residual_size` is smaller than the
    /// largest possible frame.
    pub fn validate(&self) -> Result<()> {
        if self.max_residual_size < MAX_FRAME_SIZE {
            return Err(Error::Config(format!(
                "max_residual_size must be at least {MAX_FRAME_SIZE} bytes, got {}",
                self.max_residual_size
            )));
        }
        Ok(())
    }
}
