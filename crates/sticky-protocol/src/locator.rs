//! Header location strategies.
//!
//! A [`HeaderLocator`] answers one question: where is the next candidate
//! frame header at or after a given position? Two strategies are provided:
//!
//! - [`ContiguousLocator`] (default): the header bytes must appear adjacent,
//!   matched with a sliding window.
//! - [`CompatLocator`]: the legacy matcher. It searches for each header byte
//!   independently, each one after the previous hit, and reports
//!   `last_hit - (HEADER_LEN - 1)`. That is the real header start only when
//!   the markers happen to be adjacent, so it produces false positives on
//!   streams such as `AA 00 BB`. Use it only to reproduce captures from the
//!   legacy tool.
//!
//! ```
//! use sticky_protocol::locator::{CompatLocator, ContiguousLocator, HeaderLocator};
//!
//! let buf = [0xAA, 0x00, 0xBB, 0xAA, 0xBB];
//! assert_eq!(ContiguousLocator.locate(&buf, 0), Some(3));
//! assert_eq!(CompatLocator.locate(&buf, 0), Some(1));
//! ```

use std::fmt;
use sticky_core::{HeaderMatch, constants::{HEADER, HEADER_LEN}};

/// Finds the start of a candidate frame header.
///
/// Implementations must never return a position before `from`, so that the
/// assembler's scan cursor only moves forward.
pub trait HeaderLocator: fmt::Debug + Send + Sync {
    /// Position of the next candidate header at or after `from`, or `None`
    /// if the buffer holds no further candidate.
    fn locate(&self, buf: &[u8], from: usize) -> Option<usize>;
}

/// Strict matcher: the header bytes must be adjacent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContiguousLocator;

impl HeaderLocator for ContiguousLocator {
    fn locate(&self, buf: &[u8], from: usize) -> Option<usize> {
        buf.get(from..)?
            .windows(HEADER_LEN)
            .position(|window| window == HEADER)
            .map(|offset| from + offset)
    }
}

/// Legacy matcher, see the [module docs](self).
///
/// A header byte that is never found is skipped and the search for the next
/// one starts from the same place. Only the final header byte decides whether
/// a candidate exists. A computed start that would fall before `from` is
/// clamped to `from`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatLocator;

impl HeaderLocator for CompatLocator {
    fn locate(&self, buf: &[u8], from: usize) -> Option<usize> {
        let mut search_from = from;
        let mut last_hit = None;

        for (i, &marker) in HEADER.iter().enumerate() {
            let hit = buf
                .get(search_from..)
                .and_then(|rest| rest.iter().position(|&b| b == marker))
                .map(|offset| search_from + offset);

            match hit {
                Some(pos) if i == HEADER_LEN - 1 => last_hit = Some(pos),
                Some(pos) => search_from = pos + 1,
                None => {}
            }
        }

        last_hit.map(|pos| (pos + 1).saturating_sub(HEADER_LEN).max(from))
    }
}

/// Build the locator selected by a [`HeaderMatch`] setting.
pub fn locator_for(mode: HeaderMatch) -> Box<dyn HeaderLocator> {
    match mode {
        HeaderMatch::Contiguous => Box::new(ContiguousLocator),
        HeaderMatch::Compat => Box::new(CompatLocator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::at_start(&[0xAA, 0xBB, 0x04], 0, Some(0))]
    #[case::after_garbage(&[0x00, 0x11, 0xAA, 0xBB], 0, Some(2))]
    #[case::from_skips_earlier(&[0xAA, 0xBB, 0xAA, 0xBB], 1, Some(2))]
    #[case::from_at_match(&[0x00, 0xAA, 0xBB], 1, Some(1))]
    #[case::split_markers(&[0xAA, 0x00, 0xBB], 0, None)]
    #[case::reversed(&[0xBB, 0xAA], 0, None)]
    #[case::partial_at_end(&[0x00, 0xAA], 0, None)]
    #[case::doubled_first_marker(&[0xAA, 0xAA, 0xBB], 0, Some(1))]
    #[case::empty(&[], 0, None)]
    #[case::from_past_end(&[0xAA, 0xBB], 5, None)]
    fn test_contiguous_locate(
        #[case] buf: &[u8],
        #[case] from: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(ContiguousLocator.locate(buf, from), expected);
    }

    #[rstest]
    #[case::at_start(&[0xAA, 0xBB, 0x04], 0, Some(0))]
    #[case::after_garbage(&[0x00, 0x11, 0xAA, 0xBB], 0, Some(2))]
    #[case::split_markers(&[0xAA, 0x00, 0xBB], 0, Some(1))]
    #[case::wide_gap(&[0xAA, 0x01, 0x02, 0x03, 0xBB, 0x05], 0, Some(3))]
    #[case::reversed_uses_second(&[0xBB, 0xAA, 0x00, 0xBB], 0, Some(2))]
    #[case::missing_first_marker(&[0x00, 0x01, 0xBB], 0, Some(1))]
    #[case::clamped_to_from(&[0x00, 0x01, 0xBB, 0x03], 2, Some(2))]
    #[case::missing_last_marker(&[0xAA, 0x00, 0x00], 0, None)]
    #[case::partial_at_end(&[0x00, 0xAA], 0, None)]
    #[case::empty(&[], 0, None)]
    #[case::from_past_end(&[0xAA, 0xBB], 5, None)]
    fn test_compat_locate(
        #[case] buf: &[u8],
        #[case] from: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(CompatLocator.locate(buf, from), expected);
    }

    #[test]
    fn test_locators_agree_on_contiguous_headers() {
        let buf = [0x10, 0x20, 0xAA, 0xBB, 0x04, 0x01, 0x02, 0x03, 0x04, 0xFF];
        for from in 0..=2 {
            assert_eq!(
                ContiguousLocator.locate(&buf, from),
                CompatLocator.locate(&buf, from)
            );
        }
    }

    #[test]
    fn test_never_returns_before_from() {
        let buf = [0xBB, 0xAA, 0xBB, 0x00, 0xBB, 0xAA, 0xBB];
        for from in 0..buf.len() {
            if let Some(pos) = CompatLocator.locate(&buf, from) {
                assert!(pos >= from, "compat returned {pos} for from={from}");
            }
            if let Some(pos) = ContiguousLocator.locate(&buf, from) {
                assert!(pos >= from, "contiguous returned {pos} for from={from}");
            }
        }
    }

    #[test]
    fn test_locator_for_mode() {
        let buf = [0xAA, 0x00, 0xBB];
        assert_eq!(locator_for(HeaderMatch::Contiguous).locate(&buf, 0), None);
        assert_eq!(locator_for(HeaderMatch::Compat).locate(&buf, 0), Some(1));
    }
}
