//! Block builder.
//!
//! Expands each coalesced [`Window`] from [`crate::reconcile`] into a
//! [`TriBlock`]: the MINE/YOURS ranges implied by the window's hunks (or
//! interpolated from the previous block when a thread contributed
//! nothing), the per-file line-pointer arrays, and the block's
//! classification.

use thiserror::Error;

use crate::hunk::PairHunk;
use crate::line::{Lin, Line, LineRange};
use crate::reconcile::Window;

/// How a [`TriBlock`] differs across the three files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// MINE and YOURS agree with each other and differ from COMMON.
    SameAsCommon3rd,
    /// Only MINE changed relative to COMMON; YOURS matches COMMON.
    OnlyMine,
    /// Only YOURS changed relative to COMMON; MINE matches COMMON.
    OnlyYours,
    /// Both threads changed, and disagree with each other.
    AllDiffer,
}

/// A reconciled region spanning MINE, COMMON, and YOURS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriBlock {
    pub kind: BlockKind,
    pub range_mine: LineRange,
    pub range_common: LineRange,
    pub range_yours: LineRange,
    pub lines_mine: Vec<Line>,
    pub lines_common: Vec<Line>,
    pub lines_yours: Vec<Line>,
}

/// Errors building a [`TriBlock`] from a coalesced window.
#[derive(Debug, Error)]
pub enum BlockError {
    /// Two hunks, one from each thread, claimed the same COMMON line with
    /// different content.
    #[error("internal error in block format")]
    ConflictingCommonContent { line: Lin },

    /// A COMMON slot within the window's range was never populated by
    /// either thread's hunks — a gap that should be structurally
    /// impossible given well-formed, adjacency-coalesced input.
    #[error("internal error in block format")]
    IncompleteCommon { line: Lin },
}

#[derive(Clone, Copy)]
struct Carry {
    high_common: Lin,
    high_mine: Lin,
    high_yours: Lin,
}

impl Carry {
    const START: Self = Self {
        high_common: 0,
        high_mine: 0,
        high_yours: 0,
    };

    const fn high(&self, thread: usize) -> Lin {
        match thread {
            0 => self.high_mine,
            _ => self.high_yours,
        }
    }
}

/// Build the ordered [`TriBlock`] sequence for a reconciled window list.
///
/// # Errors
///
/// Returns [`BlockError`] if the two pairwise diffs disagree about
/// COMMON's content, or if a window leaves a COMMON line uncovered by
/// either thread — both indicate malformed provider output that escaped
/// [`crate::hunk::parse_hunks`]' validation.
pub fn build_blocks(windows: &[Window]) -> Result<Vec<TriBlock>, BlockError> {
    let mut blocks = Vec::with_capacity(windows.len());
    let mut carry = Carry::START;

    for window in windows {
        let range_common = LineRange::new(window.low_c, window.high_c);
        let lines_common = install_common(window, &range_common)?;

        let range_mine = derive_range(window, 0, &carry);
        let lines_mine = install_thread(window, 0, &range_mine, &range_common, &lines_common);

        let range_yours = derive_range(window, 1, &carry);
        let lines_yours = install_thread(window, 1, &range_yours, &range_common, &lines_common);

        let kind = classify(window, &range_mine, &lines_mine, &range_yours, &lines_yours);

        carry = Carry {
            high_common: range_common.high,
            high_mine: range_mine.high,
            high_yours: range_yours.high,
        };

        blocks.push(TriBlock {
            kind,
            range_mine,
            range_common,
            range_yours,
            lines_mine,
            lines_common,
            lines_yours,
        });
    }

    Ok(blocks)
}

fn derive_range(window: &Window, thread: usize, carry: &Carry) -> LineRange {
    match (window.using[thread].first(), window.using[thread].last()) {
        (Some(first), Some(last)) => {
            let low = window.low_c - first.range_c.low + first.range_a.low;
            let high = window.high_c - last.range_c.high + last.range_a.high;
            LineRange::new(low, high)
        }
        _ => {
            let low = window.low_c - carry.high_common + carry.high(thread);
            let high = window.high_c - carry.high_common + carry.high(thread);
            LineRange::new(low, high)
        }
    }
}

fn install_common(window: &Window, range_common: &LineRange) -> Result<Vec<Line>, BlockError> {
    let len = range_common.len().max(0) as usize;
    let mut slots: Vec<Option<Line>> = vec![None; len];

    for hunks in &window.using {
        for hunk in hunks {
            for (i, line) in hunk.lines_c.iter().enumerate() {
                let line_num = hunk.range_c.low + i as Lin;
                let idx = (line_num - range_common.low) as usize;
                match &slots[idx] {
                    None => slots[idx] = Some(line.clone()),
                    Some(existing) if existing == line => {}
                    Some(_) => {
                        return Err(BlockError::ConflictingCommonContent { line: line_num });
                    }
                }
            }
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.ok_or(BlockError::IncompleteCommon {
                line: range_common.low + i as Lin,
            })
        })
        .collect()
}

fn install_thread(
    window: &Window,
    thread: usize,
    range_d: &LineRange,
    range_common: &LineRange,
    lines_common: &[Line],
) -> Vec<Line> {
    let mut out = Vec::with_capacity(range_d.len().max(0) as usize);
    let mut cur_common = range_common.low;

    for hunk in &window.using[thread] {
        let gap = hunk.range_c.low - cur_common;
        for k in 0..gap {
            let idx = (cur_common - range_common.low + k) as usize;
            out.push(lines_common[idx].clone());
        }
        out.extend(hunk.lines_a.iter().cloned());
        cur_common = hunk.range_c.high + 1;
    }

    let trailing = range_common.high + 1 - cur_common;
    for k in 0..trailing {
        let idx = (cur_common - range_common.low + k) as usize;
        out.push(lines_common[idx].clone());
    }

    out
}

fn classify(
    window: &Window,
    range_mine: &LineRange,
    lines_mine: &[Line],
    range_yours: &LineRange,
    lines_yours: &[Line],
) -> BlockKind {
    if window.using[0].is_empty() {
        return BlockKind::OnlyYours;
    }
    if window.using[1].is_empty() {
        return BlockKind::OnlyMine;
    }
    if range_mine.len() == range_yours.len() && lines_mine == lines_yours {
        BlockKind::SameAsCommon3rd
    } else {
        BlockKind::AllDiffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunk::HunkKind;
    use bytes::Bytes;

    fn line(s: &str) -> Line {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn only_mine_block_copies_common_into_yours() {
        let hunk = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(1, 1),
            range_c: LineRange::new(1, 1),
            lines_a: vec![line("mine\n")],
            lines_c: vec![line("common\n")],
        };
        let window = Window {
            low_c: 1,
            high_c: 1,
            using: [vec![hunk], Vec::new()],
        };
        let blocks = build_blocks(&[window]).unwrap();
        assert_eq!(blocks.len(), 1);
        let b = &blocks[0];
        assert_eq!(b.kind, BlockKind::OnlyMine);
        assert_eq!(b.range_yours, LineRange::new(1, 1));
        assert_eq!(b.lines_yours, vec![line("common\n")]);
    }

    #[test]
    fn same_as_common_3rd_when_mine_and_yours_agree() {
        let h0 = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(1, 1),
            range_c: LineRange::new(1, 1),
            lines_a: vec![line("new\n")],
            lines_c: vec![line("old\n")],
        };
        let h1 = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(1, 1),
            range_c: LineRange::new(1, 1),
            lines_a: vec![line("new\n")],
            lines_c: vec![line("old\n")],
        };
        let window = Window {
            low_c: 1,
            high_c: 1,
            using: [vec![h0], vec![h1]],
        };
        let blocks = build_blocks(&[window]).unwrap();
        assert_eq!(blocks[0].kind, BlockKind::SameAsCommon3rd);
    }

    #[test]
    fn all_differ_when_both_change_but_disagree() {
        let h0 = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(1, 1),
            range_c: LineRange::new(1, 1),
            lines_a: vec![line("mine\n")],
            lines_c: vec![line("old\n")],
        };
        let h1 = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(1, 1),
            range_c: LineRange::new(1, 1),
            lines_a: vec![line("yours\n")],
            lines_c: vec![line("old\n")],
        };
        let window = Window {
            low_c: 1,
            high_c: 1,
            using: [vec![h0], vec![h1]],
        };
        let blocks = build_blocks(&[window]).unwrap();
        assert_eq!(blocks[0].kind, BlockKind::AllDiffer);
    }

    #[test]
    fn conflicting_common_content_is_an_error() {
        let h0 = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(1, 1),
            range_c: LineRange::new(1, 2),
            lines_a: vec![line("m\n")],
            lines_c: vec![line("c1\n"), line("c2\n")],
        };
        let h1 = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(1, 1),
            range_c: LineRange::new(2, 2),
            lines_a: vec![line("y\n")],
            lines_c: vec![line("DIFFERENT\n")],
        };
        let window = Window {
            low_c: 1,
            high_c: 2,
            using: [vec![h0], vec![h1]],
        };
        let err = build_blocks(&[window]).unwrap_err();
        assert!(matches!(err, BlockError::ConflictingCommonContent { line: 2 }));
    }

    #[test]
    fn gap_between_same_thread_hunks_is_filled_from_common() {
        let h0a = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(1, 1),
            range_c: LineRange::new(1, 1),
            lines_a: vec![line("m1\n")],
            lines_c: vec![line("c1\n")],
        };
        let h0b = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(5, 5),
            range_c: LineRange::new(5, 5),
            lines_a: vec![line("m5\n")],
            lines_c: vec![line("c5\n")],
        };
        let h1 = PairHunk {
            kind: HunkKind::Change,
            range_a: LineRange::new(2, 4),
            range_c: LineRange::new(2, 4),
            lines_a: vec![line("y2\n"), line("y3\n"), line("y4\n")],
            lines_c: vec![line("c2\n"), line("c3\n"), line("c4\n")],
        };
        let window = Window {
            low_c: 1,
            high_c: 5,
            using: [vec![h0a, h0b], vec![h1]],
        };
        let blocks = build_blocks(&[window]).unwrap();
        let b = &blocks[0];
        assert_eq!(b.range_mine, LineRange::new(1, 5));
        assert_eq!(
            b.lines_mine,
            vec![
                line("m1\n"),
                line("c2\n"),
                line("c3\n"),
                line("c4\n"),
                line("m5\n"),
            ]
        );
    }
}
