//! Three-way reconciler — the core algorithm.
//!
//! Walks two hunk chains (`T0`: MINE vs COMMON, `T1`: YOURS vs COMMON) in
//! lockstep over COMMON's line axis, coalescing overlapping or directly
//! adjacent hunks into windows. Each window is handed to [`crate::block`]
//! for expansion into a [`crate::block::TriBlock`].
//!
//! This module does not itself build blocks — it only decides which hunks
//! belong together. That separation mirrors the reference algorithm's own
//! two-phase structure (`make_3way_diff` followed by
//! `using_to_diff3_block`), and keeps the window-selection tie-break
//! (the part most prone to off-by-one bugs) isolated and independently
//! testable.

use crate::hunk::PairHunk;
use crate::line::Lin;

/// One coalesced region of COMMON's line axis, with the hunks from each
/// thread that touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Inclusive COMMON range covered by this window's hunks. May be
    /// narrower than the gap-filled range the block builder ultimately
    /// assigns the block, which also covers untouched COMMON lines
    /// bordering the window on exactly one side when only one thread has
    /// a hunk there.
    pub low_c: Lin,
    pub high_c: Lin,
    /// Hunks from thread 0 (MINE vs COMMON) and thread 1 (YOURS vs
    /// COMMON) absorbed into this window, each in ascending COMMON order.
    pub using: [Vec<PairHunk>; 2],
}

/// Coalesce two pairwise hunk chains into an ordered window sequence.
///
/// `threads[0]` and `threads[1]` must each be sorted in strictly
/// increasing, non-overlapping `range_c.low` order — the guarantee
/// [`crate::hunk::parse_hunks`] provides for a single provider invocation.
#[must_use]
pub fn reconcile(threads: [&[PairHunk]; 2]) -> Vec<Window> {
    let mut cursor = [0usize, 0usize];
    let mut windows = Vec::new();

    loop {
        let candidate = match (
            cursor[0] < threads[0].len(),
            cursor[1] < threads[1].len(),
        ) {
            (false, false) => break,
            (true, false) => 0,
            (false, true) => 1,
            (true, true) => {
                if threads[0][cursor[0]].range_c.low <= threads[1][cursor[1]].range_c.low {
                    0
                } else {
                    1
                }
            }
        };

        let mut base_thread = candidate;
        let mut using: [Vec<PairHunk>; 2] = [Vec::new(), Vec::new()];

        let first = threads[base_thread][cursor[base_thread]].clone();
        let low_c = first.range_c.low;
        let mut hw = first.range_c.high;
        using[base_thread].push(first);
        cursor[base_thread] += 1;

        loop {
            let other = 1 - base_thread;
            let Some(next) = threads[other].get(cursor[other]) else {
                break;
            };
            if next.range_c.low > hw + 1 {
                break;
            }
            let next = next.clone();
            if next.range_c.high > hw {
                hw = next.range_c.high;
                base_thread = other;
            }
            using[other].push(next);
            cursor[other] += 1;
        }

        windows.push(Window {
            low_c,
            high_c: hw,
            using,
        });
    }

    windows
}
