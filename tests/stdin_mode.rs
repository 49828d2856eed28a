use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    Command::cargo_bin("rbf").unwrap()
}

#[test]
fn runs_a_program_piped_on_stdin() {
    cargo_bin()
        .write_stdin("SET 72;PRNT")
        .assert()
        .success()
        .stdout("H\n");
}

#[test]
fn empty_stdin_prints_the_usage_hint() {
    cargo_bin()
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn whitespace_only_stdin_prints_the_usage_hint() {
    cargo_bin()
        .write_stdin("  \n\t\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn comments_and_unknown_words_still_run() {
    cargo_bin()
        .write_stdin("# greeting #\nBANANA SET 33;PRNTN")
        .assert()
        .success()
        .stdout("33\n");
}
