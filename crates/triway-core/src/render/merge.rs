//! Merge mode: stream MINE through, replacing classified regions with
//! conflict markers or YOURS's content.

use std::io::{BufRead, Write};

use crate::block::{BlockKind, TriBlock};
use crate::config::{Config, Labels};
use crate::line::{Lin, Line};

use super::{conflict_disposition, RenderError};

fn copy_lines<R: BufRead, W: Write>(input: &mut R, out: &mut W, count: Lin) -> Result<(), RenderError> {
    let mut buf = Vec::new();
    for _ in 0..count {
        buf.clear();
        let n = input.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Err(RenderError::MineShrank);
        }
        out.write_all(&buf)?;
    }
    Ok(())
}

fn skip_lines<R: BufRead>(input: &mut R, count: Lin, is_last: bool) -> Result<(), RenderError> {
    let mut buf = Vec::new();
    for i in 0..count {
        buf.clear();
        let n = input.read_until(b'\n', &mut buf)?;
        if n == 0 {
            let is_final_line_of_input = is_last && i + 1 == count;
            if is_final_line_of_input {
                return Ok(());
            }
            return Err(RenderError::MineShrank);
        }
    }
    Ok(())
}

fn write_lines<W: Write>(out: &mut W, lines: &[Line]) -> Result<(), RenderError> {
    for line in lines {
        out.write_all(line)?;
    }
    Ok(())
}

/// Stream `mine` through `out`, replacing each reconciled block's MINE
/// range with its resolved content.
///
/// Returns whether any conflict was emitted.
///
/// # Errors
///
/// Returns [`RenderError::Io`] on a write failure, or
/// [`RenderError::MineShrank`] if `mine` ends before the walk has
/// consumed everything the block chain expects from it.
pub fn write_merge<R: BufRead, W: Write>(
    mine: &mut R,
    out: &mut W,
    blocks: &[TriBlock],
    cfg: &Config,
    labels: &Labels,
) -> Result<bool, RenderError> {
    let mut conflicts_found = false;
    let mut consumed: Lin = 0;

    for (index, block) in blocks.iter().enumerate() {
        let Some(conflict) = conflict_disposition(block.kind, cfg) else {
            continue;
        };
        let is_last = index + 1 == blocks.len();

        copy_lines(mine, out, block.range_mine.low - 1 - consumed)?;
        consumed = block.range_mine.low - 1;

        if conflict {
            conflicts_found = true;
            if block.kind == BlockKind::AllDiffer {
                writeln!(out, "<<<<<<< {}", labels.mine)?;
                write_lines(out, &block.lines_mine)?;
            }
            if cfg.show_2nd {
                let marker = if block.kind == BlockKind::AllDiffer {
                    "|||||||"
                } else {
                    "<<<<<<<"
                };
                writeln!(out, "{marker} {}", labels.older)?;
                write_lines(out, &block.lines_common)?;
            }
            writeln!(out, "=======")?;
        }

        write_lines(out, &block.lines_yours)?;

        if conflict {
            writeln!(out, ">>>>>>> {}", labels.yours)?;
        }

        skip_lines(mine, block.range_mine.len(), is_last)?;
        consumed = block.range_mine.high;
    }

    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = mine.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf)?;
    }

    Ok(conflicts_found)
}
