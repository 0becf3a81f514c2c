//! Pairwise hunk parsing.
//!
//! Turns a diff provider's normal-format output — `control\n{body}` entries
//! — into an ordered list of [`PairHunk`]s. The provider is invoked as
//! `diff A C`, so a hunk's `range_a`/`lines_a` describe file A (MINE or
//! YOURS) and `range_c`/`lines_c` describe file C (COMMON).
//!
//! # Control line grammar
//!
//! ```text
//! L[,L] a L[,L]      -- Add: C has lines that A doesn't
//! L[,L] c L[,L]      -- Change: both sides have differing lines
//! L[,L] d L[,L]      -- Delete: A has lines that C doesn't
//! ```
//!
//! A single number collapses both ends of that side's range. Body lines use
//! `< ` (from A) and `> ` (from C), separated by `---\n` for `Change`. A
//! line starting with `\` immediately after a body line means "no newline
//! at end of file" for the line just read.

use bytes::Bytes;
use thiserror::Error;

use crate::line::{Line, LineRange, Lin};

/// What a [`PairHunk`] represents: what C→A would need to do to this
/// region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HunkKind {
    /// A has no lines here; C has an insertion.
    Add,
    /// Both sides have differing, non-empty content.
    Change,
    /// A has lines here that C does not.
    Delete,
}

/// A single aligned region between file A and the common file C, as found
/// by one pairwise diff invocation.
///
/// Hunks within one pairwise diff are produced in strictly increasing
/// order of `range_c.low` and never overlap on C.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairHunk {
    pub kind: HunkKind,
    pub range_a: LineRange,
    pub range_c: LineRange,
    /// Empty for `Add`.
    pub lines_a: Vec<Line>,
    /// Empty for `Delete`.
    pub lines_c: Vec<Line>,
}

impl PairHunk {
    #[must_use]
    pub fn numlines_a(&self) -> Lin {
        self.range_a.len()
    }

    #[must_use]
    pub fn numlines_c(&self) -> Lin {
        self.range_c.len()
    }
}

/// Errors parsing a diff provider's output into [`PairHunk`]s.
///
/// Every variant is fatal: diff3's reconciler cannot make progress on
/// malformed provider output, so the caller should surface these as a
/// Trouble exit rather than attempt recovery.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A control line did not match `L[,L](a|c|d)L[,L]`.
    #[error("diff failed: {line}")]
    BadControlLine {
        /// The offending line, verbatim (lossily decoded for display).
        line: String,
    },

    /// A `Change` hunk's body was missing the `---` separator.
    #[error("invalid diff format; invalid change separator")]
    MissingSeparator,

    /// A body line did not start with the expected `< ` or `> ` prefix.
    #[error("invalid diff format; incorrect leading line chars")]
    BadLinePrefix,

    /// The provider output ended before a hunk's body was fully read.
    #[error("invalid diff format; unexpected end of input")]
    UnexpectedEof,

    /// Non-empty provider output did not end in a newline.
    #[error("invalid diff format; incomplete last line")]
    IncompleteLastLine,
}

/// Parse one pairwise diff's complete provider output into an ordered hunk
/// list.
///
/// `buffer` is retained (via `Bytes`' reference counting) by every line
/// payload returned, so the caller does not need to keep it alive
/// separately.
pub fn parse_hunks(buffer: Bytes) -> Result<Vec<PairHunk>, ParseError> {
    if !buffer.is_empty() && buffer[buffer.len() - 1] != b'\n' {
        return Err(ParseError::IncompleteLastLine);
    }

    let mut hunks = Vec::new();
    let mut pos = 0usize;

    while pos < buffer.len() {
        let line_start = pos;
        let (kind, mut range_a, mut range_c, control_end) = parse_control_line(&buffer, pos)?;
        if control_end >= buffer.len() || buffer[control_end] != b'\n' {
            return Err(bad_control_line(&buffer, line_start));
        }
        pos = control_end + 1;

        match kind {
            HunkKind::Add => range_a = LineRange::insertion_after(range_a.low - 1),
            HunkKind::Delete => range_c = LineRange::insertion_after(range_c.low - 1),
            HunkKind::Change => {}
        }

        let lines_a = if matches!(kind, HunkKind::Add) {
            Vec::new()
        } else {
            read_lines(&buffer, &mut pos, range_a.len(), b'<')?
        };

        if matches!(kind, HunkKind::Change) {
            const SEP: &[u8] = b"---\n";
            if !buffer[pos..].starts_with(SEP) {
                return Err(ParseError::MissingSeparator);
            }
            pos += SEP.len();
        }

        let lines_c = if matches!(kind, HunkKind::Delete) {
            Vec::new()
        } else {
            read_lines(&buffer, &mut pos, range_c.len(), b'>')?
        };

        hunks.push(PairHunk {
            kind,
            range_a,
            range_c,
            lines_a,
            lines_c,
        });
    }

    Ok(hunks)
}

fn bad_control_line(buffer: &Bytes, line_start: usize) -> ParseError {
    let end = buffer[line_start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(buffer.len(), |rel| line_start + rel + 1);
    ParseError::BadControlLine {
        line: String::from_utf8_lossy(&buffer[line_start..end]).into_owned(),
    }
}

/// Skip spaces and tabs, returning the new position.
fn skip_white(buffer: &[u8], mut pos: usize) -> usize {
    while pos < buffer.len() && matches!(buffer[pos], b' ' | b'\t') {
        pos += 1;
    }
    pos
}

/// Read a run of ASCII digits as a [`Lin`]. Returns `None` if `pos` is not
/// the start of a number.
fn read_num(buffer: &[u8], mut pos: usize) -> Option<(Lin, usize)> {
    let start = pos;
    let mut value: Lin = 0;
    while pos < buffer.len() && buffer[pos].is_ascii_digit() {
        value = value * 10 + Lin::from(buffer[pos] - b'0');
        pos += 1;
    }
    if pos == start { None } else { Some((value, pos)) }
}

/// Parse `L[,L](a|c|d)L[,L]` starting at `pos`. Returns the hunk kind, the
/// two raw (pre-adjustment) ranges, and the position just past the control
/// line's content (before the trailing newline).
fn parse_control_line(
    buffer: &[u8],
    pos: usize,
) -> Result<(HunkKind, LineRange, LineRange, usize), ParseError> {
    let err = || bad_control_line(&Bytes::copy_from_slice(buffer), pos);

    let pos = skip_white(buffer, pos);
    let (a_low, pos) = read_num(buffer, pos).ok_or_else(err)?;
    let pos = skip_white(buffer, pos);
    let (a_high, pos) = if buffer.get(pos) == Some(&b',') {
        let (n, p) = read_num(buffer, pos + 1).ok_or_else(err)?;
        (n, skip_white(buffer, p))
    } else {
        (a_low, pos)
    };

    let pos = skip_white(buffer, pos);
    let (kind, pos) = match buffer.get(pos) {
        Some(b'a') => (HunkKind::Add, pos + 1),
        Some(b'c') => (HunkKind::Change, pos + 1),
        Some(b'd') => (HunkKind::Delete, pos + 1),
        _ => return Err(err()),
    };

    let pos = skip_white(buffer, pos);
    let (c_low, pos) = read_num(buffer, pos).ok_or_else(err)?;
    let pos = skip_white(buffer, pos);
    let (c_high, pos) = if buffer.get(pos) == Some(&b',') {
        let (n, p) = read_num(buffer, pos + 1).ok_or_else(err)?;
        (n, skip_white(buffer, p))
    } else {
        (c_low, pos)
    };

    Ok((kind, LineRange::new(a_low, a_high), LineRange::new(c_low, c_high), pos))
}

/// Read `count` body lines, each expected to start with `leading` followed
/// by a space, advancing `pos` past them (and past any trailing "no
/// newline" annotation line, which is consumed but not stored).
///
/// A line immediately followed by a `\` line has its trailing newline
/// stripped from the returned payload; the renderer is responsible for
/// re-synthesizing a newline where an output format requires one.
fn read_lines(
    buffer: &Bytes,
    pos: &mut usize,
    count: Lin,
    leading: u8,
) -> Result<Vec<Line>, ParseError> {
    let mut lines = Vec::with_capacity(count.max(0) as usize);
    for _ in 0..count {
        if buffer.len() < *pos + 2 || buffer[*pos] != leading || buffer[*pos + 1] != b' ' {
            return Err(ParseError::BadLinePrefix);
        }
        let start = *pos + 2;
        let nl = buffer[start..]
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(ParseError::UnexpectedEof)?;
        let mut end = start + nl + 1;
        let mut payload = buffer.slice(start..end);

        if buffer.get(end) == Some(&b'\\') {
            payload = payload.slice(0..payload.len() - 1);
            let rest = buffer[end..]
                .iter()
                .position(|&b| b == b'\n')
                .ok_or(ParseError::UnexpectedEof)?;
            end += rest + 1;
        }

        lines.push(payload);
        *pos = end;
    }
    Ok(lines)
}
