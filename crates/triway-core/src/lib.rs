//! Three-way line-diff reconciliation engine.
//!
//! Composes two pairwise line diffs (MINE↔COMMON and YOURS↔COMMON) into a
//! single three-way block sequence, classifies each region, and renders
//! the result as a descriptive report, an editor script, or a merged file
//! with conflict markers.
//!
//! # Pipeline
//!
//! ```text
//! DiffProvider -> parse_hunks -> reconcile -> build_blocks -> render::*
//! ```
//!
//! Callers needing only the reconciliation core (no subprocess, no CLI)
//! can use [`reconcile_pair`] directly against two already-parsed hunk
//! chains, or [`reconcile_diffs`] against raw provider output.

pub mod block;
pub mod config;
pub mod hunk;
pub mod line;
pub mod provider;
pub mod reconcile;
pub mod render;

use bytes::Bytes;
use thiserror::Error;

pub use block::{BlockKind, TriBlock};
pub use config::{Config, Labels, OutputMode};
pub use hunk::{HunkKind, PairHunk};
pub use line::{Lin, Line, LineRange};
pub use provider::{DiffProvider, ExternalDiff, ProviderError};

/// Any failure in the parse-and-reconcile pipeline, excluding subprocess
/// invocation and rendering, which have their own error types.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] hunk::ParseError),
    #[error(transparent)]
    Reconcile(#[from] block::BlockError),
}

/// Reconcile two already-parsed hunk chains into an ordered [`TriBlock`]
/// sequence.
///
/// # Errors
///
/// Returns [`block::BlockError`] if the two pairwise diffs disagree about
/// COMMON's content.
pub fn reconcile_pair(
    mine_vs_common: &[PairHunk],
    yours_vs_common: &[PairHunk],
) -> Result<Vec<TriBlock>, block::BlockError> {
    let windows = reconcile::reconcile([mine_vs_common, yours_vs_common]);
    block::build_blocks(&windows)
}

/// Parse and reconcile two raw pairwise-diff byte streams (as produced by
/// a [`DiffProvider`]) into an ordered [`TriBlock`] sequence.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] if either stream is malformed, or
/// [`EngineError::Reconcile`] if the two diffs disagree about COMMON's
/// content.
pub fn reconcile_diffs(
    mine_vs_common: Bytes,
    yours_vs_common: Bytes,
) -> Result<Vec<TriBlock>, EngineError> {
    let t0 = hunk::parse_hunks(mine_vs_common)?;
    let t1 = hunk::parse_hunks(yours_vs_common)?;
    Ok(reconcile_pair(&t0, &t1)?)
}
