//! Candidate frame validation.
//!
//! Given a buffer and the position of a candidate header,
//! [`FrameValidator::validate`] classifies the candidate without mutating
//! anything:
//!
//! | Outcome | Condition |
//! |---------|-----------|
//! | [`Validation::NeedMoreData`] | length byte, payload or trailer not yet buffered |
//! | [`Validation::Invalid`] | length below the protocol floor, or trailer is not `0xFF` |
//! | [`Validation::Valid`] | trailer is `0xFF`; carries the frame and the position after it |
//!
//! A length below the floor is rejected as soon as the length byte is
//! visible, without waiting for the rest of the candidate.

use bytes::Bytes;
use std::fmt;
use sticky_core::constants::*;

use crate::frame::Frame;

/// Why a candidate header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The length field is below [`MIN_PAYLOAD_LEN`].
    LengthBelowFloor { length: u8 },

    /// The byte where the trailer should be is not [`TRAILER_BYTE`].
    BadTrailer { found: u8 },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::LengthBelowFloor { length } => {
                write!(f, "length {length} below floor of {MIN_PAYLOAD_LEN}")
            }
            InvalidReason::BadTrailer { found } => {
                write!(f, "trailer {found:02X}, expected {TRAILER_BYTE:02X}")
            }
        }
    }
}

/// Result of validating one candidate header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Not enough bytes buffered to decide.
    NeedMoreData,

    /// The candidate is not a frame.
    Invalid(InvalidReason),

    /// A complete frame; `end` is the position immediately after it.
    Valid { frame: Frame, end: usize },
}

/// Stateless classifier for candidate frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameValidator;

impl FrameValidator {
    /// Classify the candidate whose header starts at `header_pos`.
    ///
    /// # Example
    /// ```
    /// use sticky_protocol::validator::{FrameValidator, Validation};
    ///
    /// let buf = [0xAA, 0xBB, 0x04, 0x01, 0x02, 0x03, 0x04, 0xFF];
    ///
    /// assert_eq!(FrameValidator::validate(&buf[..5], 0), Validation::NeedMoreData);
    /// match FrameValidator::validate(&buf, 0) {
    ///     Validation::Valid { frame, end } => {
    ///         assert_eq!(frame.payload(), &[1, 2, 3, 4]);
    ///         assert_eq!(end, 8);
    ///     }
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// ```
    pub fn validate(buf: &[u8], header_pos: usize) -> Validation {
        let length_pos = header_pos + HEADER_LEN;
        let Some(&length) = buf.get(length_pos) else {
            return Validation::NeedMoreData;
        };

        if (length as usize) < MIN_PAYLOAD_LEN {
            return Validation::Invalid(InvalidReason::LengthBelowFloor { length });
        }

        let trailer_pos = length_pos + LENGTH_FIELD_LEN + length as usize;
        let Some(&trailer) = buf.get(trailer_pos) else {
            return Validation::NeedMoreData;
        };

        if trailer != TRAILER_BYTE {
            return Validation::Invalid(InvalidReason::BadTrailer { found: trailer });
        }

        let end = trailer_pos + TRAILER_LEN;
        let frame = Frame::from_validated(Bytes::copy_from_slice(&buf[header_pos..end]));
        Validation::Valid { frame, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FRAME_A: [u8; 8] = [0xAA, 0xBB, 0x04, 0x01, 0x02, 0x03, 0x04, 0xFF];

    #[rstest]
    #[case::header_only(2)]
    #[case::length_only(3)]
    #[case::partial_payload(5)]
    #[case::missing_trailer(7)]
    fn test_need_more_data(#[case] available: usize) {
        assert_eq!(
            FrameValidator::validate(&FRAME_A[..available], 0),
            Validation::NeedMoreData
        );
    }

    #[test]
    fn test_valid_frame() {
        match FrameValidator::validate(&FRAME_A, 0) {
            Validation::Valid { frame, end } => {
                assert_eq!(end, FRAME_A.len());
                assert_eq!(frame.as_bytes(), &FRAME_A);
            }
            other => panic!("Expected Valid, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_frame_at_offset_ignores_trailing_bytes() {
        let mut buf = vec![0x00, 0x00];
        buf.extend_from_slice(&FRAME_A);
        buf.extend_from_slice(&[0xAA, 0xBB]);

        match FrameValidator::validate(&buf, 2) {
            Validation::Valid { frame, end } => {
                assert_eq!(end, 10);
                assert_eq!(frame.payload(), &[1, 2, 3, 4]);
            }
            other => panic!("Expected Valid, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_trailer() {
        let mut buf = FRAME_A;
        buf[7] = 0x00;
        assert_eq!(
            FrameValidator::validate(&buf, 0),
            Validation::Invalid(InvalidReason::BadTrailer { found: 0x00 })
        );
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    fn test_length_below_floor_rejected_immediately(#[case] length: u8) {
        // Only the length byte is needed to reject
        let buf = [0xAA, 0xBB, length];
        assert_eq!(
            FrameValidator::validate(&buf, 0),
            Validation::Invalid(InvalidReason::LengthBelowFloor { length })
        );
    }

    #[test]
    fn test_max_length_needs_all_bytes() {
        let mut buf = vec![0xAA, 0xBB, 0xFF];
        buf.extend(std::iter::repeat_n(0x11, MAX_PAYLOAD_LEN));
        assert_eq!(FrameValidator::validate(&buf, 0), Validation::NeedMoreData);

        buf.push(TRAILER_BYTE);
        assert!(matches!(
            FrameValidator::validate(&buf, 0),
            Validation::Valid { end: MAX_FRAME_SIZE, .. }
        ));
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(
            InvalidReason::BadTrailer { found: 0x0A }.to_string(),
            "trailer 0A, expected FF"
        );
        assert_eq!(
            InvalidReason::LengthBelowFloor { length: 2 }.to_string(),
            "length 2 below floor of 4"
        );
    }
}
