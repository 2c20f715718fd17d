use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env_remove("BF_TAPE_SIZE")
        .env_remove("BF_RADIX")
        .env_remove("BF_REPL_MODE")
        .timeout(Duration::from_secs(5));
    cmd
}

#[test]
fn empty_input_exits_clean_and_quiet() {
    cargo_bin()
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn each_line_runs_and_echoes_the_current_cell() {
    cargo_bin()
        .write_stdin("++.\n+\n")
        .assert()
        .success()
        .stdout("22\n3\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn tape_persists_across_lines() {
    cargo_bin()
        .write_stdin("++++++++\n[>++++++++<-]\n>+.\n")
        .assert()
        .success()
        .stdout("8\n0\nAA\n");
}

#[test]
fn open_loop_waits_for_more_lines() {
    cargo_bin()
        .write_stdin("++[\n>+++<-\n]>.\n")
        .assert()
        .success()
        .stdout("66\n");
}

#[test]
fn stray_loop_end_rejects_only_that_submission() {
    cargo_bin()
        .write_stdin("+]\n+\n")
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("(error): structural"));
}

#[test]
fn eof_inside_open_loop_is_fatal() {
    cargo_bin()
        .write_stdin("+[\n-\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unclosed '['"));
}

#[test]
fn exit_meta_command_stops_the_session() {
    cargo_bin()
        .write_stdin("+\n:exit\n+\n")
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn program_input_comes_from_the_same_channel() {
    cargo_bin()
        .write_stdin(",+.\n64\n")
        .assert()
        .success()
        .stdout("AA\n");
}

#[test]
fn forced_editor_on_non_tty_errors() {
    cargo_bin()
        .arg("--editor")
        .write_stdin("+.")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("stdin is not a TTY"));
}

#[test]
fn bare_flag_overrides_env_mode() {
    cargo_bin()
        .env("BF_REPL_MODE", "editor")
        .arg("--bare")
        .write_stdin("+++.")
        .assert()
        .success()
        .stdout("33\n");
}
