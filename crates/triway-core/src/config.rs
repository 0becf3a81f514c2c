//! Explicit configuration record threaded through the engine, replacing
//! the reference tool's global option flags.

/// Which of the three output renderers to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Descriptive three-way report.
    Report,
    /// Editor script.
    EdScript,
    /// In-place merge with conflict markers.
    Merge,
}

/// Display names for MINE, OLDER, YOURS, in that order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    pub mine: String,
    pub older: String,
    pub yours: String,
}

impl Labels {
    #[must_use]
    pub fn by_index(&self, index: usize) -> &str {
        match index {
            0 => &self.mine,
            1 => &self.older,
            _ => &self.yours,
        }
    }
}

/// The resolved, validated configuration for one reconciliation run.
///
/// Built by the CLI front end from its parsed flags; passed by reference
/// into the renderer and the provider driver. No field here is
/// process-wide or mutable after construction.
#[derive(Clone, Debug)]
pub struct Config {
    pub mode: OutputMode,

    /// `-A`/`--show-all`, or implied by `--merge` with no other
    /// mode-selecting flag: show non-conflicting YOURS-only changes too.
    pub show_2nd: bool,
    /// Bracket `AllDiffer` (and, with `show_2nd`, `OnlyYours`) blocks as
    /// conflicts rather than silently resolving them.
    pub flagging: bool,
    /// `-x`/`-X`: emit only overlapping (conflicting) changes.
    pub overlap_only: bool,
    /// `-3`/`--easy-only`: emit only non-overlapping changes.
    pub simple_only: bool,
    /// `-i`: append `w`/`q` to the produced ed script.
    pub write_and_quit: bool,
    /// `-T`/`--initial-tab`: indent report lines with a tab, not two
    /// spaces.
    pub initial_tab: bool,

    /// `-a`/`--text`: forwarded to the diff provider only.
    pub text: bool,
    /// `--strip-trailing-cr`: forwarded to the diff provider only.
    pub strip_trailing_cr: bool,
    /// `--diff-program`: the provider executable (default `diff`).
    pub diff_program: String,

    pub labels: Labels,
}
