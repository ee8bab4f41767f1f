//! Sticky/split packet frame decoding.
//!
//! Turns a delimiter-free byte stream, delivered in arbitrary chunks, into
//! validated [`Frame`]s of the form `AA BB <len> <payload> FF`.
//!
//! - [`locator`]: finds candidate headers ([`HeaderLocator`])
//! - [`validator`]: classifies a candidate ([`FrameValidator`])
//! - [`assembler`]: owns the residual buffer and drives both ([`FrameAssembler`])
//! - [`codec`]: `tokio_util` decoder on top of the assembler ([`StickyCodec`])

pub mod assembler;
pub mod codec;
pub mod frame;
pub mod locator;
pub mod validator;

pub use assembler::{DecoderStats, FrameAssembler};
pub use codec::StickyCodec;
pub use frame::Frame;
pub use locator::{CompatLocator, ContiguousLocator, HeaderLocator};
pub use validator::{FrameValidator, InvalidReason, Validation};
