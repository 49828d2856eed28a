// These tests exercise INPUT with stdin as a pipe; the program itself comes
// from a file so stdin stays free for the program's input.
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
fn echo_demo_echoes_a_piped_character() {
    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/echo.rbf");
    cargo_bin()
        .arg(demo)
        .write_stdin("Z")
        .assert()
        .success()
        .stdout("Z\n")
        .stderr(predicate::str::contains("stdin is not a terminal"));
}

#[test]
fn input_assembles_multibyte_utf8() {
    let tf = program_file("INPUT;PRNT");
    cargo_bin()
        .arg(tf.path())
        .write_stdin("é")
        .assert()
        .success()
        .stdout("é\n");
}

#[test]
fn input_decodes_a_malformed_byte_as_the_replacement_char() {
    // 0xFF is not a valid UTF-8 leading byte; 65533 is U+FFFD.
    let tf = program_file("INPUT;PRNTN");
    cargo_bin()
        .arg(tf.path())
        .write_stdin(vec![0xFFu8])
        .assert()
        .success()
        .stdout("65533\n");
}

#[test]
fn input_at_eof_stores_zero() {
    let tf = program_file("INPUT;PRNTN");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn piped_input_warning_appears_once() {
    let tf = program_file("INPUT;INPUT;PRNTN");
    cargo_bin()
        .arg(tf.path())
        .write_stdin("AB")
        .assert()
        .success()
        .stdout("66\n")
        .stderr(predicate::str::contains("stdin is not a terminal").count(1));
}
