//! Tokio codec for sticky frame decoding.
//!
//! [`StickyCodec`] wraps a [`FrameAssembler`] so that any `AsyncRead` can be
//! turned into a stream of [`Frame`]s with `tokio_util::codec::FramedRead`.
//!
//! ```text
//! AsyncRead -> FramedRead<_, StickyCodec> -> Stream<Item = Result<Frame>>
//! ```
//!
//! The codec moves every byte it is handed into the assembler, so `src` is
//! always left empty. Frames completed by one read are queued and returned by
//! successive `decode` calls.
//!
//! # Usage with Tokio FramedRead
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use sticky_protocol::StickyCodec;
//! use tokio_util::codec::FramedRead;
//!
//! # async fn example() -> sticky_core::Result<()> {
//! let (reader, _writer) = tokio::io::duplex(1024);
//! let mut frames = FramedRead::new(reader, StickyCodec::new());
//!
//! while let Some(frame) = frames.next().await {
//!     println!("Received: {}", frame?);
//! }
//! # Ok(())
//! # }
//! ```

use bytes::BytesMut;
use std::collections::VecDeque;
use sticky_core::{DecoderConfig, Error, Result};
use tokio_util::codec::Decoder;
use tracing::debug;

use crate::assembler::{DecoderStats, FrameAssembler};
use crate::frame::Frame;

/// Recommended initial capacity for the pending frame queue.
const INITIAL_FRAME_QUEUE_CAPACITY: usize = 4;

/// Tokio decoder producing [`Frame`]s.
#[derive(Debug)]
pub struct StickyCodec {
    assembler: FrameAssembler,

    /// Frames already assembled but not yet returned from `decode`.
    pending: VecDeque<Frame>,
}

impl StickyCodec {
    /// Create a codec with the default decoder configuration.
    pub fn new() -> Self {
        Self::from_assembler(FrameAssembler::new())
    }

    /// Create a codec with a custom decoder configuration.
    ///
    /// # Errors
    /// Returns `Error::Config` if the configuration fails validation.
    pub fn with_config(config: DecoderConfig) -> Result<Self> {
        Ok(Self::from_assembler(FrameAssembler::with_config(config)?))
    }

    /// Wrap an existing assembler.
    pub fn from_assembler(assembler: FrameAssembler) -> Self {
        Self {
            assembler,
            pending: VecDeque::with_capacity(INITIAL_FRAME_QUEUE_CAPACITY),
        }
    }

    /// Counters of the underlying assembler.
    pub fn stats(&self) -> DecoderStats {
        self.assembler.stats()
    }

    /// Number of frames assembled but not yet returned.
    pub fn frames_pending(&self) -> usize {
        self.pending.len()
    }
}

impl Default for StickyCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for StickyCodec {
    type Item = Frame;
    type Error = Error;

    /// Returns `Ok(Some(frame))` while frames are available and `Ok(None)`
    /// when more data is needed. Malformed input is never an error.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        if !src.is_empty() {
            let chunk = src.split();
            self.pending.extend(self.assembler.ingest(&chunk));
        }

        Ok(self.pending.pop_front())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        let frame = self.decode(src)?;
        if frame.is_none() && self.assembler.residual_len() > 0 {
            debug!(
                unresolved = self.assembler.residual_len(),
                "Stream ended with unresolved bytes"
            );
            self.assembler.clear();
        }
        Ok(frame)
    }
}
