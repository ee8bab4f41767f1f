use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use sticky_core::{Error, Result, constants::*};

/// Frame is one complete, validated protocol unit as it appeared on the wire.
///
/// A Frame owns the raw bytes of the unit including header, length field,
/// payload and trailer. Accessors slice into those bytes without copying.
///
/// # Wire Format
/// ```text
/// AA BB  08  01 02 03 04 05 06 07 08  FF
/// ^^^^^  ^^  ^^^^^^^^^^^^^^^^^^^^^^^  ^^
/// header N   payload (N bytes)        trailer
/// ```
///
/// # Basic Usage
/// ```
/// use sticky_protocol::Frame;
///
/// let frame = Frame::from_payload(&[0x01, 0x02, 0x03, 0x04]).unwrap();
///
/// assert_eq!(frame.length(), 4);
/// assert_eq!(frame.payload(), &[0x01, 0x02, 0x03, 0x04]);
/// assert_eq!(frame.size(), 8);
/// assert_eq!(frame.to_hex(), "AA BB 04 01 02 03 04 FF");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Raw bytes of the frame, header through trailer
    data: Bytes,
}

impl Frame {
    /// Wrap bytes the validator has already checked.
    ///
    /// The caller guarantees that `data` holds exactly
    /// `FRAME_OVERHEAD + data[HEADER_LEN]` bytes and ends with the trailer.
    pub(crate) fn from_validated(data: Bytes) -> Self {
        debug_assert!(data.len() >= FRAME_OVERHEAD);
        debug_assert_eq!(data.len(), data[HEADER_LEN] as usize + FRAME_OVERHEAD);
        debug_assert_eq!(data[data.len() - 1], TRAILER_BYTE);
        Frame { data }
    }

    /// Build a frame around `payload`.
    ///
    /// # Errors
    /// Returns `Error::PayloadTooShort` if the payload is below the protocol
    /// floor and `Error::PayloadTooLong` if it does not fit the length byte.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let len = payload.len();
        if len < MIN_PAYLOAD_LEN {
            return Err(Error::PayloadTooShort {
                len,
                min: MIN_PAYLOAD_LEN,
            });
        }
        if len > MAX_PAYLOAD_LEN {
            return Err(Error::PayloadTooLong {
                len,
                max: MAX_PAYLOAD_LEN,
            });
        }

        let mut buf = BytesMut::with_capacity(len + FRAME_OVERHEAD);
        buf.put_slice(&HEADER);
        buf.put_u8(len as u8);
        buf.put_slice(payload);
        buf.put_u8(TRAILER_BYTE);

        Ok(Frame { data: buf.freeze() })
    }

    /// Parse a buffer holding exactly one frame.
    ///
    /// # Errors
    /// Returns `Error::InvalidFrame` if the header, length field, size or
    /// trailer do not describe a single well-formed frame.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_FRAME_SIZE {
            return Err(Error::InvalidFrame(format!(
                "{} bytes is shorter than the minimum frame of {MIN_FRAME_SIZE}",
                bytes.len()
            )));
        }
        if bytes[..HEADER_LEN] != HEADER {
            return Err(Error::InvalidFrame(format!(
                "bad header {}",
                to_hex(&bytes[..HEADER_LEN])
            )));
        }

        let len = bytes[HEADER_LEN] as usize;
        if len < MIN_PAYLOAD_LEN {
            return Err(Error::PayloadTooShort {
                len,
                min: MIN_PAYLOAD_LEN,
            });
        }
        if bytes.len() != len + FRAME_OVERHEAD {
            return Err(Error::InvalidFrame(format!(
                "length field says {} bytes, buffer holds {}",
                len + FRAME_OVERHEAD,
                bytes.len()
            )));
        }

        let trailer = bytes[bytes.len() - 1];
        if trailer != TRAILER_BYTE {
            return Err(Error::InvalidFrame(format!(
                "bad trailer {trailer:02X}"
            )));
        }

        Ok(Frame {
            data: Bytes::copy_from_slice(bytes),
        })
    }

    /// The two header bytes.
    ///
    /// These equal [`HEADER`] unless the frame was located with the legacy
    /// non-contiguous header match.
    pub fn header(&self) -> &[u8] {
        &self.data[..HEADER_LEN]
    }

    /// Value of the length field.
    pub fn length(&self) -> u8 {
        self.data[HEADER_LEN]
    }

    /// Payload bytes (exactly [`Frame::length`] of them).
    pub fn payload(&self) -> &[u8] {
        let start = HEADER_LEN + LENGTH_FIELD_LEN;
        &self.data[start..self.data.len() - TRAILER_LEN]
    }

    /// The trailer byte, always [`TRAILER_BYTE`].
    pub fn trailer(&self) -> u8 {
        self.data[self.data.len() - 1]
    }

    /// Raw bytes of the whole frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Total size on the wire (payload length + 4).
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Consume the frame and return its raw bytes.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Uppercase, space separated hex dump of the whole frame.
    pub fn to_hex(&self) -> String {
        to_hex(&self.data)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Format bytes as uppercase hex pairs separated by spaces.
///
/// ```
/// assert_eq!(sticky_protocol::frame::to_hex(&[0xAA, 0x0B, 0xFF]), "AA 0B FF");
/// assert_eq!(sticky_protocol::frame::to_hex(&[]), "");
/// ```
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
