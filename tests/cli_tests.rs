//! Binary-level CLI tests.
//!
//! These tests run the compiled `pomonoise` binary and verify argument
//! parsing, help output, and the daemon-free local commands. Commands that
//! need a running daemon are not exercised here; the IPC flow is covered by
//! the integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn pomonoise() -> Command {
    Command::cargo_bin("pomonoise").unwrap()
}

// ============================================================================
// Help / Version
// ============================================================================

#[test]
fn test_help_lists_commands() {
    pomonoise()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("stop"))
        .stdout(predicate::str::contains("sounds"))
        .stdout(predicate::str::contains("infinite"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_version() {
    pomonoise()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pomonoise"));
}

#[test]
fn test_no_args_prints_help() {
    pomonoise()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

// ============================================================================
// Local commands (no daemon required)
// ============================================================================

#[test]
fn test_sounds_lists_catalog() {
    pomonoise()
        .arg("sounds")
        .assert()
        .success()
        .stdout(predicate::str::contains("rain"))
        .stdout(predicate::str::contains("ocean"))
        .stdout(predicate::str::contains("forest"))
        .stdout(predicate::str::contains("brown_noise"));
}

#[test]
fn test_completions_bash() {
    pomonoise()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pomonoise"));
}

#[test]
fn test_completions_zsh() {
    pomonoise()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ============================================================================
// Argument validation
// ============================================================================

#[test]
fn test_duration_zero_is_rejected_at_parse() {
    pomonoise()
        .args(["duration", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn test_duration_non_numeric_is_rejected_at_parse() {
    pomonoise()
        .args(["duration", "abc"])
        .assert()
        .failure();
}

#[test]
fn test_duration_invalid_mode_is_rejected() {
    pomonoise()
        .args(["duration", "5", "--mode", "nap"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_sound_is_rejected_at_parse() {
    pomonoise()
        .args(["sound", "thunder"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rain"));
}

#[test]
fn test_unknown_command_is_rejected() {
    pomonoise()
        .arg("snooze")
        .assert()
        .failure();
}

#[test]
fn test_completions_invalid_shell_is_rejected() {
    pomonoise()
        .args(["completions", "invalid"])
        .assert()
        .failure();
}
