//! Common test utilities for sticky-protocol integration tests.
//!
//! Helpers fall into two groups:
//!
//! 1. **Encoding helpers** (`encode`, `encode_all`) build wire bytes
//! 2. **Feeding helpers** (`feed_chunks`, `split_at_points`) push bytes through
//!    an assembler the way a transport would

#![allow(dead_code)]

use sticky_protocol::{Frame, FrameAssembler};

/// Wire bytes of a single frame around `payload`.
pub fn encode(payload: &[u8]) -> Vec<u8> {
    Frame::from_payload(payload)
        .expect("Test payload should be 4-255 bytes")
        .as_bytes()
        .to_vec()
}

/// Wire bytes of several frames back to back (a sticky packet).
pub fn encode_all(payloads: &[&[u8]]) -> Vec<u8> {
    payloads.iter().flat_map(|p| encode(p)).collect()
}

/// Split `bytes` at the given (unsorted, possibly repeated) offsets.
///
/// Repeated offsets yield empty chunks, which transports may deliver.
pub fn split_at_points(bytes: &[u8], points: &[usize]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = points.iter().map(|&p| p.min(bytes.len())).collect();
    cuts.sort_unstable();

    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        chunks.push(bytes[start..cut].to_vec());
        start = cut;
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

/// Feed every chunk and collect all emitted frames in order.
pub fn feed_chunks<C: AsRef<[u8]>>(assembler: &mut FrameAssembler, chunks: &[C]) -> Vec<Frame> {
    chunks
        .iter()
        .flat_map(|chunk| assembler.ingest(chunk.as_ref()))
        .collect()
}

/// Payloads of `frames`, for compact assertions.
pub fn payloads(frames: &[Frame]) -> Vec<Vec<u8>> {
    frames.iter().map(|f| f.payload().to_vec()).collect()
}
