//! Wire-level constants for the sticky frame protocol.
//!
//! Every frame on the wire has the same fixed layout:
//!
//! ```text
//! offset 0..1      : header  = 0xAA 0xBB
//! offset 2         : length N (1 byte, N >= 4)
//! offset 3..3+N-1  : payload (N opaque bytes)
//! offset 3+N       : trailer = 0xFF
//! ```
//!
//! The protocol has no escaping: header and trailer byte values may appear
//! freely inside the payload. Frame boundaries are recovered purely from the
//! header, the length field and the trailer marker.
//!
//! # Usage
//!
//! ```
//! use sticky_core::constants::*;
//!
//! let payload_len = 8usize;
//! assert_eq!(HEADER_LEN + LENGTH_FIELD_LEN + payload_len + TRAILER_LEN, payload_len + FRAME_OVERHEAD);
//! assert_eq!(MAX_FRAME_SIZE, 259);
//! ```

// ============================================================================
// Framing Markers
// ============================================================================

/// Fixed two-byte marker that opens every frame.
///
/// ```text
/// [AA BB] 08 01 02 03 04 05 06 07 08 FF
///  ^^^^^
///  header
/// ```
pub const HEADER: [u8; 2] = [0xAA, 0xBB];

/// Width of [`HEADER`] in bytes.
///
/// Resynchronization after a rejected candidate always skips exactly this
/// many bytes.
pub const HEADER_LEN: usize = HEADER.len();

/// Width of the length field that follows the header.
pub const LENGTH_FIELD_LEN: usize = 1;

/// Sanity marker closing every frame.
///
/// This is a fixed byte, not a checksum over the payload.
pub const TRAILER_BYTE: u8 = 0xFF;

/// Width of the trailer in bytes.
pub const TRAILER_LEN: usize = 1;

// ============================================================================
// Frame Sizes
// ============================================================================

/// Bytes a frame adds around its payload (header + length + trailer).
pub const FRAME_OVERHEAD: usize = HEADER_LEN + LENGTH_FIELD_LEN + TRAILER_LEN;

/// Protocol floor for the length field.
///
/// A length byte below this value never describes a valid frame.
pub const MIN_PAYLOAD_LEN: usize = 4;

/// Largest payload the single length byte can describe.
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// Smallest valid frame on the wire.
pub const MIN_FRAME_SIZE: usize = MIN_PAYLOAD_LEN + FRAME_OVERHEAD;

/// Largest frame on the wire.
///
/// A residual buffer smaller than this could never hold a complete frame,
/// so configured limits are validated against it.
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_LEN + FRAME_OVERHEAD;

// ============================================================================
// Buffer Limits
// ============================================================================

/// Default cap on bytes retained between `ingest` calls (64 KB).
pub const DEFAULT_MAX_RESIDUAL_SIZE: usize = 64 * 1024;

/// Initial capacity of the residual buffer.
pub const INITIAL_RESIDUAL_CAPACITY: usize = 1024;
