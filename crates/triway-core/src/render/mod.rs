//! Output renderer: three ways to present a reconciled block chain.

pub mod edscript;
pub mod merge;
pub mod report;

use thiserror::Error;

use crate::block::BlockKind;
use crate::config::Config;

/// Errors producing output from a reconciled block chain.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("error writing output: {0}")]
    Io(#[from] std::io::Error),

    /// MINE's input stream ended before the merge walk finished consuming
    /// it.
    #[error("input file shrank")]
    MineShrank,
}

/// Whether `kind` should be treated as a conflict, or skipped entirely,
/// under the editor-script/merge output rules. Returns `None` when the
/// block is skipped outright.
#[must_use]
pub fn conflict_disposition(kind: BlockKind, cfg: &Config) -> Option<bool> {
    match kind {
        BlockKind::OnlyMine => None,
        BlockKind::SameAsCommon3rd => cfg.show_2nd.then_some(true),
        BlockKind::OnlyYours => (!cfg.overlap_only).then_some(false),
        BlockKind::AllDiffer => (!cfg.simple_only).then_some(cfg.flagging),
    }
}
