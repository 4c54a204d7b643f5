//! Tests for the top-level CLI surface

mod common;

use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let env = common::TestEnv::new();

    env.toolpack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_version_command_shows_cache_format() {
    let env = common::TestEnv::new();

    env.toolpack()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("toolpack"))
        .stdout(predicate::str::contains("Resolver cache format: 1"))
        .stdout(predicate::str::contains("Default target: net8.0/any"));
}

#[test]
fn test_completions_for_bash() {
    let env = common::TestEnv::new();

    env.toolpack()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("toolpack"));
}

#[test]
fn test_completions_unknown_shell_fails() {
    let env = common::TestEnv::new();

    env.toolpack()
        .args(["completions", "--shell", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shell: tcsh"));
}

#[test]
fn test_list_empty_store() {
    let env = common::TestEnv::new();

    env.toolpack()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tool packages installed."));
}

#[test]
fn test_invalid_package_id_is_rejected() {
    let env = common::TestEnv::new();

    env.toolpack()
        .args(["install", ".stage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid package id"));
}
