//! End-to-end CLI tests: build three real files on disk, run the built
//! `triway` binary against them, and check stdout/exit status.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn triway() -> Command {
    Command::cargo_bin("triway").unwrap()
}

#[test]
fn report_mode_only_yours_change_exits_clean() {
    let dir = tempfile::tempdir().unwrap();
    let mine = write(dir.path(), "mine", "a\nb\nc\n");
    let older = write(dir.path(), "older", "a\nb\nc\n");
    let yours = write(dir.path(), "yours", "a\nX\nc\n");

    triway()
        .args([&mine, &older, &yours])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("====3"))
        .stdout(predicate::str::contains("X"));
}

#[test]
fn report_mode_conflicting_change_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let mine = write(dir.path(), "mine", "a\nMINE\nc\n");
    let older = write(dir.path(), "older", "a\nb\nc\n");
    let yours = write(dir.path(), "yours", "a\nYOURS\nc\n");

    triway()
        .args([&mine, &older, &yours])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("====\n"))
        .stdout(predicate::str::contains("MINE"))
        .stdout(predicate::str::contains("YOURS"));
}

#[test]
fn merge_mode_resolves_one_sided_change_without_conflict_markers() {
    let dir = tempfile::tempdir().unwrap();
    let mine = write(dir.path(), "mine", "a\nb\nc\n");
    let older = write(dir.path(), "older", "a\nb\nc\n");
    let yours = write(dir.path(), "yours", "a\nX\nc\n");

    triway()
        .args([&mine, &older, &yours, &PathBuf::from("-m")])
        .assert()
        .code(0)
        .stdout(predicate::eq("a\nX\nc\n"));
}

#[test]
fn merge_mode_brackets_conflicting_change() {
    let dir = tempfile::tempdir().unwrap();
    let mine = write(dir.path(), "mine", "a\nMINE\nc\n");
    let older = write(dir.path(), "older", "a\nb\nc\n");
    let yours = write(dir.path(), "yours", "a\nYOURS\nc\n");

    triway()
        .args([mine.to_str().unwrap(), older.to_str().unwrap(), yours.to_str().unwrap(), "-m"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("<<<<<<<"))
        .stdout(predicate::str::contains("MINE"))
        .stdout(predicate::str::contains("======="))
        .stdout(predicate::str::contains("YOURS"))
        .stdout(predicate::str::contains(">>>>>>>"));
}

#[test]
fn edscript_write_and_quit_appends_wq() {
    let dir = tempfile::tempdir().unwrap();
    let mine = write(dir.path(), "mine", "a\nb\nc\n");
    let older = write(dir.path(), "older", "a\nb\nc\n");
    let yours = write(dir.path(), "yours", "a\nX\nc\n");

    triway()
        .args([mine.to_str().unwrap(), older.to_str().unwrap(), yours.to_str().unwrap(), "-e", "-i"])
        .assert()
        .code(0)
        .stdout(predicate::str::ends_with("w\nq\n"));
}

#[test]
fn stdin_operand_is_supported_for_mine() {
    let dir = tempfile::tempdir().unwrap();
    let older = write(dir.path(), "older", "a\nb\nc\n");
    let yours = write(dir.path(), "yours", "a\nX\nc\n");

    triway()
        .args(["-", older.to_str().unwrap(), yours.to_str().unwrap()])
        .write_stdin("a\nb\nc\n")
        .assert()
        .success();
}

#[test]
fn more_than_one_stdin_operand_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let yours = write(dir.path(), "yours", "a\nX\nc\n");

    triway()
        .args(["-", "-", yours.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("more than one"));
}

#[test]
fn write_and_quit_without_an_ed_flag_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mine = write(dir.path(), "mine", "a\n");
    let older = write(dir.path(), "older", "a\n");
    let yours = write(dir.path(), "yours", "a\n");

    triway()
        .args([mine.to_str().unwrap(), older.to_str().unwrap(), yours.to_str().unwrap(), "-i"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("-i requires"));
}

#[test]
fn conflicting_mode_flags_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mine = write(dir.path(), "mine", "a\n");
    let older = write(dir.path(), "older", "a\n");
    let yours = write(dir.path(), "yours", "a\n");

    triway()
        .args([mine.to_str().unwrap(), older.to_str().unwrap(), yours.to_str().unwrap(), "-m", "-e"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("only one of"));
}

#[test]
fn identical_files_produce_no_report_output() {
    let dir = tempfile::tempdir().unwrap();
    let mine = write(dir.path(), "mine", "a\nb\nc\n");
    let older = write(dir.path(), "older", "a\nb\nc\n");
    let yours = write(dir.path(), "yours", "a\nb\nc\n");

    triway()
        .args([&mine, &older, &yours])
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}
