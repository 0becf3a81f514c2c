//! Shared primitives for line-indexed data: line numbers, inclusive ranges,
//! and the immutable, reference-counted line payloads that hunks and blocks
//! point into.
//!
//! Every byte a pairwise diff provider emits for a file's content is read
//! once into a [`bytes::Bytes`] buffer; individual line payloads are then
//! zero-copy slices (`Bytes::slice`) into that buffer. Hunks and the blocks
//! built from them share these slices rather than copying line content, so
//! a multi-megabyte file pair is parsed and reconciled without duplicating
//! its text.

use std::fmt;

use bytes::Bytes;

/// A line number. Signed so that an empty range (`high = low - 1`) can fall
/// one below line zero (e.g. an insertion before the first line of a file).
pub type Lin = i64;

/// One line of file content, including its trailing newline if the source
/// had one. Shares storage with the buffer it was sliced from.
pub type Line = Bytes;

/// An inclusive line range `[low, high]`. `high < low` denotes an empty
/// range (a point of insertion rather than a span of content) — callers
/// must not assume `high >= low`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LineRange {
    pub low: Lin,
    pub high: Lin,
}

impl LineRange {
    /// A range spanning `[low, high]` inclusive.
    #[must_use]
    pub const fn new(low: Lin, high: Lin) -> Self {
        Self { low, high }
    }

    /// An empty range representing a point of insertion just after `point`.
    #[must_use]
    pub const fn insertion_after(point: Lin) -> Self {
        Self {
            low: point + 1,
            high: point,
        }
    }

    /// Number of lines covered by this range (zero if empty).
    #[must_use]
    pub const fn len(&self) -> Lin {
        if self.high < self.low {
            0
        } else {
            self.high - self.low + 1
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.high < self.low
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{},{}", self.low, self.high)
        }
    }
}
