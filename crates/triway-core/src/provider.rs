//! Diff provider: invokes an external line-diff tool and hands its output
//! to the hunk parser.
//!
//! `diff3` never compares files itself — it has always deferred pairwise
//! comparison to an external `diff`. [`DiffProvider`] makes that boundary
//! an injectable trait so the reconciliation engine can be exercised
//! without spawning a subprocess, while [`ExternalDiff`] is the real
//! implementation used by the CLI.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use bytes::Bytes;
use thiserror::Error;

/// Something that can produce normal-format diff output for a pair of
/// files.
pub trait DiffProvider {
    /// Compare `from` against `to`, returning the raw provider output
    /// (expected to be normal-diff format, suitable for [`crate::hunk::parse_hunks`]).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the provider could not be invoked, or
    /// exited with a status other than 0 (files identical) or 1 (files
    /// differ).
    fn diff(&self, from: &Path, to: &Path) -> Result<Bytes, ProviderError>;
}

/// Errors invoking an external diff provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider binary could not be spawned at all (not found, no
    /// permission, etc).
    #[error("couldn't execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The provider exited with a status other than 0 or 1.
    #[error("{program}: exited with status {status}")]
    Trouble { program: String, status: i32 },

    /// The provider was killed by a signal.
    #[error("{program}: terminated by signal")]
    Killed { program: String },
}

/// A [`DiffProvider`] that shells out to a real `diff`-compatible binary.
///
/// Grounded in the same `Command::new(..).args(..).output()` pattern used
/// throughout for subprocess-backed providers, with exit-status
/// classification following diff(1) convention: 0 means no differences,
/// 1 means differences were found (both are success from this crate's
/// point of view — only the byte output matters), anything else is
/// `Trouble`.
pub struct ExternalDiff {
    program: std::ffi::OsString,
    extra_args: Vec<std::ffi::OsString>,
}

impl ExternalDiff {
    /// Use the system `diff` binary with no extra flags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "diff".into(),
            extra_args: Vec::new(),
        }
    }

    /// Use a specific diff binary (e.g. from `$PATH` override or a
    /// `--diff-program` flag).
    #[must_use]
    pub fn with_program(program: impl Into<std::ffi::OsString>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Append an extra flag forwarded to every invocation (e.g.
    /// `--strip-trailing-cr`).
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<std::ffi::OsString>) -> Self {
        self.extra_args.push(arg.into());
        self
    }
}

impl Default for ExternalDiff {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffProvider for ExternalDiff {
    fn diff(&self, from: &Path, to: &Path) -> Result<Bytes, ProviderError> {
        let program_display = self.program.to_string_lossy().into_owned();

        let output = Command::new(&self.program)
            .args(self.extra_args.iter().map(OsStr::new))
            .arg("--horizon-lines=100")
            .arg("---no-directory")
            .arg("--")
            .arg(from)
            .arg(to)
            .output()
            .map_err(|source| ProviderError::Spawn {
                program: program_display.clone(),
                source,
            })?;

        match output.status.code() {
            Some(0 | 1) => Ok(Bytes::from(output.stdout)),
            Some(status) => Err(ProviderError::Trouble {
                program: program_display,
                status,
            }),
            None => Err(ProviderError::Killed {
                program: program_display,
            }),
        }
    }
}
