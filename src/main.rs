//! Command-line front end: parses arguments, resolves the three file
//! operands (including the single `-` stdin operand, if any), drives the
//! pairwise-diff and reconciliation pipeline, and maps the result to an
//! exit status.

mod logging;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use tempfile::NamedTempFile;

use triway_core::config::{Config, Labels, OutputMode};
use triway_core::provider::{DiffProvider, ExternalDiff};
use triway_core::render::{edscript, merge, report};
use triway_core::{hunk, reconcile_pair, BlockKind};

/// Compare three files and merge the changes made to two of them relative
/// to their common ancestor.
///
/// MINE is the file being brought up to date; OLDER is the common
/// ancestor; YOURS is the other version to reconcile against. Any one
/// operand may be `-` to read that file from standard input.
///
/// With no mode flag, prints a descriptive three-way report. `-e` and its
/// variants print an ed script; `-m` prints a merged file with conflicts
/// bracketed inline.
#[derive(Parser, Debug)]
#[command(name = "triway", version, about, disable_version_flag = true)]
struct Cli {
    /// The file to bring up to date (`-` for standard input).
    mine: String,
    /// The common ancestor of MINE and YOURS (`-` for standard input).
    older: String,
    /// The other version to reconcile against (`-` for standard input).
    yours: String,

    /// Output a merged file, incorporating both sets of changes, with
    /// unresolved conflicts bracketed inline.
    #[arg(short = 'm', long = "merge")]
    merge: bool,
    /// Output all changes, bracketing conflicts (an ed script).
    #[arg(short = 'A', long = "show-all")]
    show_all: bool,
    /// Output an ed script incorporating changes from OLDER to YOURS into MINE.
    #[arg(short = 'e', long = "ed")]
    ed: bool,
    /// Like `-e`, but bracket conflicts.
    #[arg(short = 'E', long = "show-overlap")]
    show_overlap: bool,
    /// Like `-e`, but only output overlapping (conflicting) changes.
    #[arg(short = 'x', long = "overlap-only")]
    overlap_only: bool,
    /// Like `-x`, but bracket conflicts.
    #[arg(short = 'X')]
    overlap_only_bracketed: bool,
    /// Like `-e`, but only output unmerged (non-overlapping) changes.
    #[arg(short = '3', long = "easy-only")]
    easy_only: bool,

    /// Append `w` and `q` to the produced ed script. Requires one of
    /// `-e`/`-E`/`-x`/`-X`/`-3`/`-A`.
    #[arg(short = 'i')]
    write_and_quit: bool,
    /// Treat input as text, forwarded to the diff provider.
    #[arg(short = 'a', long = "text")]
    text: bool,
    /// Indent report and merge-mode lines with a tab instead of two spaces.
    #[arg(short = 'T', long = "initial-tab")]
    initial_tab: bool,
    /// Strip trailing carriage returns, forwarded to the diff provider.
    #[arg(long = "strip-trailing-cr")]
    strip_trailing_cr: bool,
    /// Label MINE, OLDER, and YOURS with these names instead of their
    /// paths. Give up to three, in order. Requires `-m` or one of the
    /// ed-script flags.
    #[arg(short = 'L', long = "label", value_name = "LABEL")]
    labels: Vec<String>,
    /// The diff binary to invoke for each pairwise comparison.
    #[arg(long = "diff-program", value_name = "PROGRAM", default_value = "diff")]
    diff_program: String,

    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: (),
}

enum Operand {
    Path(PathBuf),
    Stdin,
}

impl Operand {
    fn parse(s: &str) -> Self {
        if s == "-" {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(s))
        }
    }

    /// Resolve to a real path, buffering standard input into a temporary
    /// file if necessary. `stdin_tmp` must outlive the returned path's
    /// use; dropping it deletes the file.
    fn materialize(self, stdin_tmp: &mut Option<NamedTempFile>) -> Result<PathBuf> {
        match self {
            Self::Path(path) => Ok(path),
            Self::Stdin => {
                let mut tmp = NamedTempFile::new()
                    .context("couldn't create a temporary file for standard input")?;
                io::copy(&mut io::stdin().lock(), &mut tmp)
                    .context("couldn't read standard input")?;
                tmp.flush()
                    .context("couldn't flush standard input to disk")?;
                let path = tmp.path().to_path_buf();
                *stdin_tmp = Some(tmp);
                Ok(path)
            }
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::from(1),
        Ok(false) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "triway failed");
            eprintln!("triway: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Run the full pipeline. Returns whether any conflict was found; the
/// caller maps that to exit status 1, and a clean run to 0.
fn run(cli: &Cli) -> Result<bool> {
    validate(cli)?;
    let mode = resolve_mode(cli);
    tracing::debug!(?mode, "resolved output mode");

    let labels = build_labels(cli);
    let cfg = build_config(cli, mode, labels.clone());

    let stdin_count = [&cli.mine, &cli.older, &cli.yours]
        .iter()
        .filter(|s| s.as_str() == "-")
        .count();
    if stdin_count > 1 {
        bail!("'-' specified for more than one input file");
    }

    let mut stdin_tmp = None;
    let mine_path = Operand::parse(&cli.mine).materialize(&mut stdin_tmp)?;
    let older_path = Operand::parse(&cli.older).materialize(&mut stdin_tmp)?;
    let yours_path = Operand::parse(&cli.yours).materialize(&mut stdin_tmp)?;

    let mut provider = ExternalDiff::with_program(cli.diff_program.clone());
    if cli.text {
        provider = provider.with_arg("--text");
    }
    if cli.strip_trailing_cr {
        provider = provider.with_arg("--strip-trailing-cr");
    }

    tracing::debug!(program = %cli.diff_program, "invoking diff provider");
    let mine_vs_common = provider
        .diff(&mine_path, &older_path)
        .inspect_err(|e| tracing::error!(%e, "diff provider failed on MINE vs OLDER"))?;
    let yours_vs_common = provider
        .diff(&yours_path, &older_path)
        .inspect_err(|e| tracing::error!(%e, "diff provider failed on YOURS vs OLDER"))?;

    let t0 = hunk::parse_hunks(mine_vs_common)?;
    let t1 = hunk::parse_hunks(yours_vs_common)?;
    tracing::debug!(mine_hunks = t0.len(), yours_hunks = t1.len(), "parsed pairwise hunks");

    let blocks = reconcile_pair(&t0, &t1)?;
    log_classification(&blocks);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    tracing::debug!(?mode, "dispatching renderer");
    match mode {
        OutputMode::Report => {
            report::write_report(&mut out, &blocks, &labels, cli.initial_tab)?;
            Ok(report::has_conflicts(&blocks))
        }
        OutputMode::EdScript => Ok(edscript::write_edscript(&mut out, &blocks, &cfg, &labels)?),
        OutputMode::Merge => {
            let mine_file = File::open(&mine_path)
                .with_context(|| format!("couldn't reopen {}", mine_path.display()))?;
            let mut reader = BufReader::new(mine_file);
            Ok(merge::write_merge(&mut reader, &mut out, &blocks, &cfg, &labels)?)
        }
    }
}

fn log_classification(blocks: &[triway_core::TriBlock]) {
    let (mut same, mut only_mine, mut only_yours, mut differ) = (0usize, 0usize, 0usize, 0usize);
    for block in blocks {
        match block.kind {
            BlockKind::SameAsCommon3rd => same += 1,
            BlockKind::OnlyMine => only_mine += 1,
            BlockKind::OnlyYours => only_yours += 1,
            BlockKind::AllDiffer => differ += 1,
        }
    }
    tracing::debug!(
        total = blocks.len(),
        same,
        only_mine,
        only_yours,
        differ,
        "classified blocks"
    );
}

fn validate(cli: &Cli) -> Result<()> {
    let mode_flag_count = [
        cli.merge,
        cli.show_all,
        cli.ed,
        cli.show_overlap,
        cli.overlap_only,
        cli.overlap_only_bracketed,
        cli.easy_only,
    ]
    .into_iter()
    .filter(|&f| f)
    .count();
    if mode_flag_count > 1 {
        bail!("only one of -m, -A, -e, -E, -x, -X, -3 may be given");
    }

    let edscript_selected = cli.show_all
        || cli.ed
        || cli.show_overlap
        || cli.overlap_only
        || cli.overlap_only_bracketed
        || cli.easy_only;

    if cli.write_and_quit && cli.merge {
        bail!("-i cannot be used with --merge");
    }
    if cli.write_and_quit && !edscript_selected {
        bail!("-i requires one of -e, -E, -x, -X, -3, -A");
    }
    if cli.labels.len() > 3 {
        bail!("at most three -L labels may be given");
    }
    let bracketing_selected =
        cli.show_all || cli.show_overlap || cli.overlap_only_bracketed || cli.merge;
    if !cli.labels.is_empty() && !bracketing_selected {
        bail!("-L requires -m or one of -A, -E, -X");
    }

    Ok(())
}

fn resolve_mode(cli: &Cli) -> OutputMode {
    if cli.merge {
        OutputMode::Merge
    } else if cli.show_all
        || cli.ed
        || cli.show_overlap
        || cli.overlap_only
        || cli.overlap_only_bracketed
        || cli.easy_only
    {
        OutputMode::EdScript
    } else {
        OutputMode::Report
    }
}

fn build_labels(cli: &Cli) -> Labels {
    let default_label = |s: &str| {
        if s == "-" {
            "standard input".to_owned()
        } else {
            s.to_owned()
        }
    };
    Labels {
        mine: cli
            .labels
            .first()
            .cloned()
            .unwrap_or_else(|| default_label(&cli.mine)),
        older: cli
            .labels
            .get(1)
            .cloned()
            .unwrap_or_else(|| default_label(&cli.older)),
        yours: cli
            .labels
            .get(2)
            .cloned()
            .unwrap_or_else(|| default_label(&cli.yours)),
    }
}

fn build_config(cli: &Cli, mode: OutputMode, labels: Labels) -> Config {
    Config {
        mode,
        show_2nd: cli.show_all || cli.merge,
        flagging: cli.show_all || cli.show_overlap || cli.merge,
        overlap_only: cli.overlap_only || cli.overlap_only_bracketed,
        simple_only: cli.easy_only,
        write_and_quit: cli.write_and_quit,
        initial_tab: cli.initial_tab,
        text: cli.text,
        strip_trailing_cr: cli.strip_trailing_cr,
        diff_program: cli.diff_program.clone(),
        labels,
    }
}
