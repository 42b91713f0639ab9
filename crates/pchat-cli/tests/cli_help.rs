use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("pchat")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("personas"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn test_sessions_help_shows_subcommands() {
    cargo_bin_cmd!("pchat")
        .args(["sessions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("rename"))
        .stdout(predicate::str::contains("terminate"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_personas_help_shows_subcommands() {
    cargo_bin_cmd!("pchat")
        .args(["personas", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("use"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("pchat")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pchat"));
}

#[test]
fn test_persona_id_must_be_numeric() {
    cargo_bin_cmd!("pchat")
        .args(["personas", "show", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
