use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::Path;

fn cargo_bin() -> Command {
    Command::cargo_bin("rbf").unwrap()
}

fn program_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn runs_a_program_from_a_file() {
    let tf = program_file("SET 72;PRNT");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stdout("H\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn addressed_goto_reads_through_the_tape() {
    // SET peeks one token, so the "!10" is inert and 5 lands in cell 0;
    // GOTO !10 reads empty cell 10 and puts the pointer back on cell 0.
    let tf = program_file("SET 5 !10;GOTO !10;PRNTN");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn step_limit_warns_but_exits_cleanly() {
    let tf = program_file("ADD;WHILE;END");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("stopped after 65536 instructions"));
}

#[test]
fn countdown_demo_prints_digits() {
    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/countdown.rbf");
    cargo_bin().arg(demo).assert().success().stdout("321\n");
}

#[test]
fn hello_demo_prints_hello() {
    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/hello.rbf");
    cargo_bin().arg(demo).assert().success().stdout("Hello\n");
}

#[test]
fn missing_file_reports_an_error() {
    cargo_bin()
        .arg("no-such-program.rbf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn help_prints_usage() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage:"));
}
