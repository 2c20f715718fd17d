use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env_remove("BF_TAPE_SIZE").env_remove("BF_RADIX").timeout(Duration::from_secs(5));
    cmd
}

#[test]
fn unclosed_loop_in_file_is_rejected_before_running() {
    let mut tf = tempfile::Builder::new().suffix(".bf").tempfile().unwrap();
    write!(tf, "+.[").unwrap();
    cargo_bin()
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("(error): structural")
                .and(predicate::str::contains("1 unclosed '['")),
        );
}

#[test]
fn stray_loop_end_points_at_the_character() {
    cargo_bin()
        .args(["-e", "+.]+["])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("stray ']' at offset 2")
                .and(predicate::str::contains("  +.]+[\n    ^")),
        );
}

#[test]
fn stray_loop_end_in_non_utf8_file_skips_the_caret() {
    let mut tf = tempfile::Builder::new().suffix(".bf").tempfile().unwrap();
    tf.write_all(b"\xff+]").unwrap();
    cargo_bin()
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("stray ']' at offset 2")
                .and(predicate::str::contains("^").not()),
        );
}

#[test]
fn wrong_extension_is_a_selection_error() {
    let mut tf = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(tf, "+.").unwrap();
    cargo_bin()
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("(error): selection")
                .and(predicate::str::contains(".bf extension")),
        );
}

#[test]
fn missing_file_is_a_selection_error() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .arg(dir.path().join("missing.bf"))
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("(error): selection")
                .and(predicate::str::contains("could not be located")),
        );
}

#[test]
fn invalid_tape_size_from_env() {
    cargo_bin()
        .env("BF_TAPE_SIZE", "none")
        .args(["-e", "+"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid value for BF_TAPE_SIZE"));
}

#[test]
fn bad_radix_flag_is_a_usage_error() {
    cargo_bin()
        .args(["--radix", "octal", "-e", "+"])
        .assert()
        .code(2);
}

#[test]
fn file_and_eval_conflict() {
    cargo_bin()
        .args(["-e", "+", "prog.bf"])
        .assert()
        .code(2);
}
