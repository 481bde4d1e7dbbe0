//! Config command specs
//!
//! Verify `fairsem config` prints the resolved configuration.

use crate::prelude::*;

#[test]
fn config_prints_defaults() {
    cli()
        .args(&["config"])
        .passes()
        .stdout_has("name = \"fairsem\"")
        .stdout_has("limit = 1")
        .stdout_has("timeout = \"10s\"")
        .stdout_has("lock_wait = \"10ms\"")
        .stdout_has("lock_ttl = \"10s\"");
}

#[test]
fn config_reads_file() {
    let temp = Project::empty();
    temp.file("sem.toml", MINIMAL_CONFIG);

    temp.fairsem()
        .args(&["config", "--config", "sem.toml"])
        .passes()
        .stdout_has("name = \"render-farm\"")
        .stdout_has("limit = 3")
        .stdout_has("timeout = \"30s\"");
}

#[test]
fn flags_override_file_values() {
    let temp = Project::empty();
    temp.file("sem.toml", MINIMAL_CONFIG);

    temp.fairsem()
        .args(&["config", "--config", "sem.toml", "--limit", "9", "--timeout", "5"])
        .passes()
        .stdout_has("name = \"render-farm\"")
        .stdout_has("limit = 9")
        .stdout_has("timeout = \"5s\"")
        .stdout_lacks("limit = 3");
}
