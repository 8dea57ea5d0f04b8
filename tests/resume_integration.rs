//! Integration tests for `--resume`.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const NER_INPUT: &str = "id,text\n\
    0,Barack Obama went to Austria.\n\
    1,Nothing here.\n\
    2,Angela Merkel met John Smith in Berlin.\n\
    3,She lives in Paris.\n";

fn xzar(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("xzar");
    cmd.env("XZAR_CONFIG", dir.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_input(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("input.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn run_to(dir: &TempDir, args: &[&str], input: &Path, output: &Path, resume: bool) {
    let mut cmd = xzar(dir);
    cmd.args(args).arg(input).arg("-o").arg(output);
    if resume {
        cmd.arg("--resume");
    }
    cmd.assert().success();
}

/// Cut `full` after `lines` complete lines, plus half of the next one.
fn interrupted(full: &str, lines: usize) -> String {
    let mut kept: Vec<&str> = full.split_inclusive('\n').collect();
    let rest = kept.split_off(lines.min(kept.len()));
    let mut cut = kept.concat();
    if let Some(next) = rest.first() {
        cut.push_str(&next[..next.len() / 2]);
    }
    cut
}

fn assert_resume_restores(args: &[&str], input_contents: &str, full_with_resume: bool) {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, input_contents);
    let reference = dir.path().join("reference.csv");
    run_to(&dir, args, &input, &reference, full_with_resume);
    let full = fs::read_to_string(&reference).unwrap();

    let output = dir.path().join("out.csv");
    for lines in 0..=full.lines().count() {
        fs::write(&output, interrupted(&full, lines)).unwrap();
        run_to(&dir, args, &input, &output, true);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            full,
            "resuming after {lines} lines"
        );
    }
}

#[test]
fn test_tokenize_resume_matches_uninterrupted_run() {
    let mut input = String::from("id,text\n");
    for i in 0..6 {
        input.push_str(&format!("{i},\"line {i}, with a comma\"\n"));
    }
    assert_resume_restores(&["tokenize", "text"], &input, false);
}

#[test]
fn test_embed_resume_matches_uninterrupted_run() {
    let mut input = String::from("text\n");
    for i in 0..5 {
        input.push_str(&format!("document {i}\n"));
    }
    assert_resume_restores(&["embed", "text", "-B", "2"], &input, false);
}

#[test]
fn test_ner_resume_matches_uninterrupted_run() {
    assert_resume_restores(&["ner", "text"], NER_INPUT, true);
}

#[test]
fn test_ner_resume_writes_input_row_column() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, NER_INPUT);
    let output = dir.path().join("out.csv");

    run_to(&dir, &["ner", "text"], &input, &output, true);
    let first = fs::read_to_string(&output).unwrap();
    assert!(first.starts_with("id,entity,entity_type,input_row\n0,Barack Obama,PERSON,0\n"));
    assert!(first.ends_with("3,Paris,GPE,3\n"));

    // A finished output is left as it is.
    run_to(&dir, &["ner", "text", "-p", "2"], &input, &output, true);
    assert_eq!(fs::read_to_string(&output).unwrap(), first);
}

#[test]
fn test_resume_into_missing_file_runs_from_start() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "text\nhello\n");
    let output = dir.path().join("new.csv");

    run_to(&dir, &["tokenize", "text"], &input, &output, true);
    assert_eq!(fs::read_to_string(&output).unwrap(), "text,tokens\nhello,hello\n");
}

#[test]
fn test_stale_output_is_fatal_and_untouched() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let stale = "text,tokens\na,a\nb,b\nc,c\n";
    fs::write(&output, stale).unwrap();
    let input = write_input(&dir, "text\na\nb\n");

    xzar(&dir)
        .args(["tokenize", "text"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--resume")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("refusing to resume"));

    assert_eq!(fs::read_to_string(&output).unwrap(), stale);
}

#[test]
fn test_header_mismatch_is_fatal() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    fs::write(&output, "text,other\na,a\n").unwrap();
    let input = write_input(&dir, "text\na\nb\n");

    xzar(&dir)
        .args(["tokenize", "text"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--resume")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("differs from expected"));
}

#[test]
fn test_resume_requires_named_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "text\na\n");

    xzar(&dir)
        .args(["tokenize", "text", "--resume"])
        .arg(&input)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains(
            "cannot resume without a named output path",
        ));
}

#[test]
fn test_locked_output_is_refused() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "text\na\n");
    let output = dir.path().join("out.csv");
    let lock = dir.path().join("out.csv.xzar.lock");
    fs::write(&lock, "{}").unwrap();

    xzar(&dir)
        .args(["tokenize", "text"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("output is locked by another process"));

    assert!(lock.exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_resume_replaces_lock_of_killed_run() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "text\na\nb\nc\n");
    let output = dir.path().join("out.csv");
    let lock = dir.path().join("out.csv.xzar.lock");
    fs::write(&output, "text,tokens\na,a\nb").unwrap();

    let host = hostname::get().unwrap().to_string_lossy().into_owned();
    let body = serde_json::json!({
        "pid": u32::MAX,
        "hostname": host,
        "started": "2024-01-01T00:00:00Z",
        "output": output,
    });
    fs::write(&lock, body.to_string()).unwrap();

    run_to(&dir, &["tokenize", "text"], &input, &output, true);

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "text,tokens\na,a\nb,b\nc,c\n"
    );
    assert!(!lock.exists());
}
