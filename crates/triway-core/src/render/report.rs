//! Descriptive three-way report mode.

use std::io::Write;

use crate::block::{BlockKind, TriBlock};
use crate::config::Labels;
use crate::line::LineRange;

use super::RenderError;

/// Which of the three files is the "odd one out" for a block, and which
/// body to suppress when printing the other two (see DESIGN.md for how
/// this was re-derived from the reference algorithm's `oddoneout`/
/// `dontprint` pair).
struct Layout {
    /// 1-based index printed after `====`, or `None` for `AllDiffer`.
    header_digit: Option<usize>,
    /// Iteration order over 1-based file indices.
    order: [usize; 3],
    /// 1-based file index whose body is suppressed, or `None` to print
    /// all three.
    suppress: Option<usize>,
}

fn layout(kind: BlockKind) -> Layout {
    match kind {
        BlockKind::OnlyMine => Layout {
            header_digit: Some(1),
            order: [1, 2, 3],
            suppress: Some(2),
        },
        BlockKind::SameAsCommon3rd => Layout {
            header_digit: Some(2),
            order: [1, 3, 2],
            suppress: Some(1),
        },
        BlockKind::OnlyYours => Layout {
            header_digit: Some(3),
            order: [1, 2, 3],
            suppress: Some(1),
        },
        BlockKind::AllDiffer => Layout {
            header_digit: None,
            order: [1, 2, 3],
            suppress: None,
        },
    }
}

fn range_and_lines<'a>(
    block: &'a TriBlock,
    file_index: usize,
) -> (&'a LineRange, &'a [crate::line::Line]) {
    match file_index {
        1 => (&block.range_mine, &block.lines_mine),
        2 => (&block.range_common, &block.lines_common),
        _ => (&block.range_yours, &block.lines_yours),
    }
}

fn format_notation(range: &LineRange) -> String {
    match range.high - range.low {
        -1 => format!("{}a", range.low - 1),
        0 => format!("{}c", range.low),
        _ => format!("{},{}c", range.low, range.high),
    }
}

/// Write the descriptive three-way report for `blocks` to `out`.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if writing to `out` fails.
pub fn write_report<W: Write>(
    out: &mut W,
    blocks: &[TriBlock],
    _labels: &Labels,
    initial_tab: bool,
) -> Result<(), RenderError> {
    let prefix = if initial_tab { "\t" } else { "  " };

    for block in blocks {
        let l = layout(block.kind);
        match l.header_digit {
            Some(d) => writeln!(out, "===={d}")?,
            None => writeln!(out, "====")?,
        }

        for &file_index in &l.order {
            let (range, lines) = range_and_lines(block, file_index);
            writeln!(out, "{file_index}:{}", format_notation(range))?;

            if l.suppress == Some(file_index) {
                continue;
            }
            if range.is_empty() {
                continue;
            }
            for (i, line) in lines.iter().enumerate() {
                write!(out, "{prefix}")?;
                out.write_all(line)?;
                let is_last = i + 1 == lines.len();
                if is_last && !line.ends_with(b"\n") {
                    writeln!(out)?;
                    writeln!(out, "\\ No newline at end of file")?;
                }
            }
        }
    }

    Ok(())
}

/// Whether any block in the reconciled chain is a conflict (`AllDiffer`)
/// — the descriptive report's own, flag-independent notion of
/// "differences found" used to decide the process exit status.
#[must_use]
pub fn has_conflicts(blocks: &[TriBlock]) -> bool {
    blocks.iter().any(|b| b.kind == BlockKind::AllDiffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockKind, TriBlock};
    use bytes::Bytes;

    fn line(s: &str) -> crate::line::Line {
        Bytes::copy_from_slice(s.as_bytes())
    }

    fn labels() -> Labels {
        Labels {
            mine: "mine".into(),
            older: "older".into(),
            yours: "yours".into(),
        }
    }

    #[test]
    fn only_mine_report_suppresses_common_body() {
        let block = TriBlock {
            kind: BlockKind::OnlyMine,
            range_mine: LineRange::new(2, 2),
            range_common: LineRange::new(2, 1),
            range_yours: LineRange::new(2, 1),
            lines_mine: vec![line("x\n")],
            lines_common: vec![],
            lines_yours: vec![],
        };
        let mut out = Vec::new();
        write_report(&mut out, &[block], &labels(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("====1\n"));
        assert!(text.contains("1:2c\n"));
        assert!(text.contains("2:1a\n"));
        assert!(text.contains("  x\n"));
    }

    #[test]
    fn all_differ_has_no_header_digit_and_no_suppression() {
        let block = TriBlock {
            kind: BlockKind::AllDiffer,
            range_mine: LineRange::new(2, 2),
            range_common: LineRange::new(2, 2),
            range_yours: LineRange::new(2, 2),
            lines_mine: vec![line("m\n")],
            lines_common: vec![line("c\n")],
            lines_yours: vec![line("y\n")],
        };
        let mut out = Vec::new();
        write_report(&mut out, &[block], &labels(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("====\n"));
        assert!(text.contains("  m\n"));
        assert!(text.contains("  c\n"));
        assert!(text.contains("  y\n"));
        assert!(has_conflicts(std::slice::from_ref(&block)));
    }

    #[test]
    fn missing_final_newline_gets_annotation() {
        let block = TriBlock {
            kind: BlockKind::OnlyYours,
            range_mine: LineRange::new(2, 1),
            range_common: LineRange::new(2, 1),
            range_yours: LineRange::new(2, 2),
            lines_mine: vec![],
            lines_common: vec![],
            lines_yours: vec![line("x")],
        };
        let mut out = Vec::new();
        write_report(&mut out, &[block], &labels(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\\ No newline at end of file\n"));
    }

    #[test]
    fn initial_tab_flag_changes_prefix() {
        let block = TriBlock {
            kind: BlockKind::OnlyMine,
            range_mine: LineRange::new(1, 1),
            range_common: LineRange::new(1, 0),
            range_yours: LineRange::new(1, 0),
            lines_mine: vec![line("x\n")],
            lines_common: vec![],
            lines_yours: vec![],
        };
        let mut out = Vec::new();
        write_report(&mut out, &[block], &labels(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\tx\n"));
    }
}
