//! CLI help specs
//!
//! Verify top-level usage and subcommand discovery.

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn simulate_help_documents_flags() {
    cli()
        .args(&["simulate", "--help"])
        .passes()
        .stdout_has("--workers")
        .stdout_has("--rounds")
        .stdout_has("--max-retries")
        .stdout_has("--config");
}

#[test]
fn version_flag_prints_version() {
    cli()
        .args(&["--version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("fairsem "));
}
