//! Editor-script mode.
//!
//! Blocks are walked in reverse so that earlier edits never shift the
//! line numbers referenced by edits still to come. Conflict blocks
//! exploit the fact that MINE's own text is already present at the edit
//! target: rather than restating it, the script brackets it in place with
//! two `a` (append) commands.

use std::io::Write;

use crate::block::{BlockKind, TriBlock};
use crate::config::{Config, Labels};
use crate::line::{Lin, Line};

use super::{conflict_disposition, RenderError};

/// Write `lines` to `out`, doubling any leading `.` (ed treats a lone `.`
/// as end-of-input). Returns whether any line was doubled.
fn dotlines<W: Write>(out: &mut W, lines: &[Line]) -> Result<bool, RenderError> {
    let mut leading_dot = false;
    for line in lines {
        if line.first() == Some(&b'.') {
            leading_dot = true;
            out.write_all(b".")?;
        }
        out.write_all(line)?;
    }
    Ok(leading_dot)
}

/// Terminate an inserted region with `.`, and if any of its lines had a
/// doubled leading dot, follow with an `s/^\.//` command over the range
/// `[start, start + num - 1]`.
fn undotlines<W: Write>(
    out: &mut W,
    leading_dot: bool,
    start: Lin,
    num: Lin,
) -> Result<(), RenderError> {
    writeln!(out, ".")?;
    if leading_dot {
        if num == 1 {
            writeln!(out, "{start}s/^\\.//")?;
        } else {
            writeln!(out, "{start},{}s/^\\.//", start + num - 1)?;
        }
    }
    Ok(())
}

/// Write the editor script for `blocks` to `out`.
///
/// Returns whether any conflict was emitted.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if writing to `out` fails.
pub fn write_edscript<W: Write>(
    out: &mut W,
    blocks: &[TriBlock],
    cfg: &Config,
    labels: &Labels,
) -> Result<bool, RenderError> {
    let mut conflicts_found = false;

    for block in blocks.iter().rev() {
        let Some(conflict) = conflict_disposition(block.kind, cfg) else {
            continue;
        };

        let low0 = block.range_mine.low;
        let high0 = block.range_mine.high;

        if conflict {
            conflicts_found = true;

            // Post edit: appended after high0.
            writeln!(out, "{high0}a")?;
            let mut leading_dot = false;
            if block.kind == BlockKind::AllDiffer {
                if cfg.show_2nd {
                    writeln!(out, "||||||| {}", labels.older)?;
                    leading_dot = dotlines(out, &block.lines_common)?;
                }
                writeln!(out, "=======")?;
                leading_dot |= dotlines(out, &block.lines_yours)?;
            }
            writeln!(out, ">>>>>>> {}", labels.yours)?;
            undotlines(
                out,
                leading_dot,
                high0 + 2,
                block.lines_common.len() as Lin + block.lines_yours.len() as Lin + 1,
            )?;

            // Pre edit: appended before low0.
            writeln!(out, "{}a", low0 - 1)?;
            let open_label = if block.kind == BlockKind::AllDiffer {
                &labels.mine
            } else {
                &labels.older
            };
            writeln!(out, "<<<<<<< {open_label}")?;
            let mut leading_dot = false;
            if block.kind == BlockKind::SameAsCommon3rd {
                leading_dot = dotlines(out, &block.lines_common)?;
                writeln!(out, "=======")?;
            }
            undotlines(out, leading_dot, low0 + 1, block.lines_common.len() as Lin)?;
        } else if block.lines_yours.is_empty() {
            if low0 == high0 {
                writeln!(out, "{low0}d")?;
            } else {
                writeln!(out, "{low0},{high0}d")?;
            }
        } else {
            match high0 - low0 {
                -1 => writeln!(out, "{high0}a")?,
                0 => writeln!(out, "{high0}c")?,
                _ => writeln!(out, "{low0},{high0}c")?,
            }
            let leading_dot = dotlines(out, &block.lines_yours)?;
            undotlines(out, leading_dot, low0, block.lines_yours.len() as Lin)?;
        }
    }

    if cfg.write_and_quit {
        writeln!(out, "w")?;
        writeln!(out, "q")?;
    }

    Ok(conflicts_found)
}
