//! CLI error specs
//!
//! Verify bad input fails loudly with a useful message.

use crate::prelude::*;

#[test]
fn no_subcommand_fails_with_usage() {
    cli()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_fails() {
    cli().args(&["frobnicate"]).fails();
}

#[test]
fn zero_limit_is_rejected() {
    cli()
        .args(&["config", "--limit", "0"])
        .fails()
        .stderr_has("limit must be at least 1");
}

#[test]
fn missing_config_file_is_reported() {
    let temp = Project::empty();
    temp.fairsem()
        .args(&["config", "--config", "absent.toml"])
        .fails()
        .stderr_has("absent.toml");
}

#[test]
fn unknown_config_key_is_rejected() {
    let temp = Project::empty();
    temp.file("sem.toml", "name = \"x\"\nlimt = 3\n");
    temp.fairsem()
        .args(&["config", "--config", "sem.toml"])
        .fails()
        .stderr_has("limt");
}
