//! Stateful frame assembly across transport deliveries.
//!
//! The transport hands over bytes in chunks whose boundaries have nothing to
//! do with frame boundaries. A single delivery may hold part of a frame
//! (split packet), several frames (sticky packet), or garbage. The
//! [`FrameAssembler`] keeps every byte it cannot yet resolve in a residual
//! buffer and, on each [`ingest`](FrameAssembler::ingest), scans that buffer
//! for complete frames.
//!
//! # Scan Loop
//!
//! ```text
//!             ┌──────────────────────────────────────────────┐
//!             v                                              │
//! ┌──────────────────────┐ none  ┌──────────────────────────┐ │
//! │ locate header≥cursor │──────>│ retain [cursor..), return│ │
//! └──────────────────────┘       └──────────────────────────┘ │
//!             │ pos                                          │
//!             v                                              │
//! ┌──────────────────────┐ need more ┌───────────────────────┐│
//! │ validate(pos)        │──────────>│ retain [pos..), return││
//! └──────────────────────┘           └───────────────────────┘│
//!       │ valid        │ invalid                              │
//!       v              v                                      │
//!  emit frame,    cursor = pos + HEADER_LEN ──────────────────┤
//!  cursor = end ──────────────────────────────────────────────┘
//! ```
//!
//! Every pass either returns or moves the cursor strictly forward, so one
//! `ingest` call always terminates. A rejected candidate (bad trailer or a
//! length below the protocol floor) skips exactly the header width, which
//! lets a real header hidden inside the rejected candidate be found on the
//! next pass.
//!
//! # Residual Limit
//!
//! Bytes that never resolve into a frame are retained until the residual
//! buffer exceeds `max_residual_size`; the configured [`OverflowPolicy`]
//! then drops the oldest bytes or resets the buffer.
//!
//! # Example
//!
//! ```
//! use sticky_protocol::FrameAssembler;
//!
//! let mut assembler = FrameAssembler::new();
//!
//! // Split packet: the frame arrives in two deliveries
//! assert!(assembler.ingest(&[0xAA, 0xBB, 0x04]).is_empty());
//! let frames = assembler.ingest(&[0x01, 0x02, 0x03, 0x04, 0xFF]);
//!
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].payload(), &[0x01, 0x02, 0x03, 0x04]);
//! assert_eq!(assembler.residual_len(), 0);
//! ```

use bytes::BytesMut;
use serde::Serialize;
use std::ops::AddAssign;
use sticky_core::{
    DecoderConfig, OverflowPolicy, Result,
    constants::{HEADER_LEN, INITIAL_RESIDUAL_CAPACITY},
};
use tracing::{debug, trace, warn};

use crate::frame::{Frame, to_hex};
use crate::locator::{HeaderLocator, locator_for};
use crate::validator::{FrameValidator, InvalidReason, Validation};

/// Running counters for one assembler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecoderStats {
    /// Frames emitted.
    pub frames_emitted: u64,

    /// Candidates rejected for a bad trailer.
    pub corrupt_frames: u64,

    /// Candidates rejected for a length below the protocol floor.
    pub malformed_lengths: u64,

    /// Bytes dropped without being part of an emitted frame.
    pub bytes_discarded: u64,

    /// Times the residual limit was hit.
    pub overflows: u64,
}

impl AddAssign for DecoderStats {
    fn add_assign(&mut self, other: Self) {
        self.frames_emitted += other.frames_emitted;
        self.corrupt_frames += other.corrupt_frames;
        self.malformed_lengths += other.malformed_lengths;
        self.bytes_discarded += other.bytes_discarded;
        self.overflows += other.overflows;
    }
}

/// Reassembles frames from an arbitrarily chunked byte stream.
///
/// One assembler serves exactly one stream. `ingest` takes `&mut self`, so
/// callers sharing an assembler between threads must serialize access
/// themselves; independent streams should simply use independent
/// assemblers.
#[derive(Debug)]
pub struct FrameAssembler {
    /// Bytes seen but not yet resolved into a frame or discarded.
    residual: BytesMut,

    /// Header search strategy.
    locator: Box<dyn HeaderLocator>,

    config: DecoderConfig,

    stats: DecoderStats,
}

impl FrameAssembler {
    /// Create an assembler with the default configuration.
    pub fn new() -> Self {
        Self::build(DecoderConfig::default(), locator_for(Default::default()))
    }

    /// Create an assembler from a configuration.
    ///
    /// # Errors
    /// Returns `Error::Config` if the configuration fails validation.
    pub fn with_config(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        let locator = locator_for(config.header_match);
        Ok(Self::build(config, locator))
    }

    /// Create an assembler with a custom header locator.
    ///
    /// `config.header_match` is ignored in favor of `locator`.
    ///
    /// # Errors
    /// Returns `Error::Config` if the configuration fails validation.
    pub fn with_locator(config: DecoderConfig, locator: Box<dyn HeaderLocator>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, locator))
    }

    fn build(config: DecoderConfig, locator: Box<dyn HeaderLocator>) -> Self {
        Self {
            residual: BytesMut::with_capacity(INITIAL_RESIDUAL_CAPACITY),
            locator,
            config,
            stats: DecoderStats::default(),
        }
    }

    /// Append `chunk` to the residual buffer and return every frame it
    /// completes, in stream order.
    ///
    /// Incomplete and corrupt input never produces an error: incomplete
    /// candidates stay buffered, rejected candidates are skipped by the
    /// header width.
    pub fn ingest(&mut self, chunk: &[u8]) -> Vec<Frame> {
        if !chunk.is_empty() {
            trace!(len = chunk.len(), bytes = %to_hex(chunk), "Received chunk");
            self.residual.extend_from_slice(chunk);
        }

        let mut frames = Vec::new();
        let mut framed_bytes = 0usize;
        let mut cursor = 0usize;

        let retain_from = loop {
            let Some(pos) = self.locator.locate(&self.residual, cursor) else {
                break cursor;
            };
            debug_assert!(pos >= cursor);

            match FrameValidator::validate(&self.residual, pos) {
                Validation::NeedMoreData => break pos,
                Validation::Valid { frame, end } => {
                    debug!(offset = pos, frame = %frame, "Parsed frame");
                    framed_bytes += frame.size();
                    self.stats.frames_emitted += 1;
                    frames.push(frame);
                    cursor = end;
                }
                Validation::Invalid(reason) => {
                    self.record_rejection(pos, reason);
                    cursor = pos + HEADER_LEN;
                }
            }
        };

        self.stats.bytes_discarded += (retain_from - framed_bytes) as u64;
        let _ = self.residual.split_to(retain_from);
        self.enforce_residual_limit();

        frames
    }

    fn record_rejection(&mut self, pos: usize, reason: InvalidReason) {
        match reason {
            InvalidReason::LengthBelowFloor { .. } => self.stats.malformed_lengths += 1,
            InvalidReason::BadTrailer { .. } => self.stats.corrupt_frames += 1,
        }
        debug!(offset = pos, %reason, "Rejected candidate header, resynchronizing");
    }

    fn enforce_residual_limit(&mut self) {
        let len = self.residual.len();
        let max = self.config.max_residual_size;
        if len <= max {
            return;
        }

        self.stats.overflows += 1;
        match self.config.overflow_policy {
            OverflowPolicy::DropOldest => {
                let excess = len - max;
                let _ = self.residual.split_to(excess);
                self.stats.bytes_discarded += excess as u64;
                warn!(dropped = excess, max, "Residual buffer overflow, dropped oldest bytes");
            }
            OverflowPolicy::Reset => {
                self.residual.clear();
                self.stats.bytes_discarded += len as u64;
                warn!(dropped = len, max, "Residual buffer overflow, buffer reset");
            }
        }
    }

    /// Bytes currently held for the next `ingest` call.
    pub fn residual(&self) -> &[u8] {
        &self.residual
    }

    /// Number of bytes currently held for the next `ingest` call.
    pub fn residual_len(&self) -> usize {
        self.residual.len()
    }

    /// Discard all buffered bytes. Counters are kept.
    pub fn clear(&mut self) {
        self.stats.bytes_discarded += self.residual.len() as u64;
        self.residual.clear();
    }

    /// Counters accumulated since the assembler was created.
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// The configuration this assembler runs with.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}
