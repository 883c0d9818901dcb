//! Smoke tests for the pixport binary.

use assert_cmd::Command;
use predicates::prelude::*;

const EXPORT: &str = concat!(
    "title: Hello World\n",
    "date: 2020-01-02 10:00\n",
    "tags: \"a\",\"b\"\n",
    "status: published\n",
    "-----\n",
    "<p>Hi <strong>there</strong></p>\n",
    "--------\n",
    "title: Hidden\n",
    "date: 2020-02-03 08:00\n",
    "status: draft\n",
    "-----\n",
    "<p>secret</p>\n",
);

#[test]
fn help_lists_core_flags() {
    let mut cmd = Command::cargo_bin("pixport").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn converts_a_small_export_tree() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pixnet");
    let output = dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join("myblog.txt"), EXPORT).unwrap();

    let mut cmd = Command::cargo_bin("pixport").unwrap();
    cmd.arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--quiet");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 article(s) written"))
        .stdout(predicate::str::contains("1 draft(s) suppressed"));

    let doc = std::fs::read_to_string(
        output.join("myblog").join("2020-01-02-hello-world.md"),
    )
    .unwrap();
    assert!(doc.contains("title: Hello World"));
    assert!(doc.contains("tags: [a, b]"));
    assert!(doc.contains("Hi **there**"));
    assert!(!output.join("myblog").join("2020-02-03-hidden.md").exists());
}

#[test]
fn dry_run_reports_but_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pixnet");
    let output = dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join("myblog.txt"), EXPORT).unwrap();

    let mut cmd = Command::cargo_bin("pixport").unwrap();
    cmd.arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--dry-run")
        .arg("--quiet");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 article(s) written"));
    assert!(!output.exists());
}

#[test]
fn missing_input_root_fails_without_panicking() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("pixport").unwrap();
    cmd.arg("--input")
        .arg(dir.path().join("nope"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .arg("--quiet");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("input root"));
}
