//! Serial transport for the sticky frame decoder.
//!
//! This crate is the thin collaborator between a byte source and a
//! [`FrameAssembler`](sticky_protocol::FrameAssembler). It opens serial
//! ports and runs a pump that reads raw chunks, feeds them to one assembler
//! and forwards the resulting frames, in order, to a bounded channel.
//!
//! ```text
//! ┌──────────────┐ chunks ┌────────────────┐ frames ┌───────────┐
//! │ Read source  │───────>│ FrameAssembler │───────>│  (mpsc)   │──> consumer
//! │ (serial/file)│        │ (pump thread)  │        └───────────┘
//! └──────────────┘        └────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sticky_protocol::FrameAssembler;
//! use sticky_serial::{FramePump, SerialConfig, open_port};
//!
//! # async fn example() -> sticky_serial::Result<()> {
//! let config = SerialConfig::default();
//! let port = open_port(&config)?;
//!
//! let mut pump = FramePump::spawn(port, FrameAssembler::new(), config.read_chunk_size);
//! while let Some(frame) = pump.recv().await {
//!     println!("Parsed: {frame}");
//! }
//! let stats = pump.finish().await?;
//! println!("{} frames", stats.frames_emitted);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod port;
mod pump;

pub use config::SerialConfig;
pub use error::{Result, SerialError};
pub use port::open_port;
pub use pump::{DEFAULT_CHANNEL_CAPACITY, FramePump};
