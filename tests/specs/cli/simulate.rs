//! Simulate command specs
//!
//! Verify the in-process contention run reports and enforces the limit.

use crate::prelude::*;

#[test]
fn simulate_stays_within_limit() {
    cli()
        .args(&[
            "simulate", "--workers", "6", "--rounds", "3", "--limit", "2", "--hold-ms", "2",
        ])
        .passes()
        .stdout_has("simulating 6 workers x 3 rounds")
        .stdout_has("acquired: 18, gave up: 0, lost: 0")
        .stdout_has("leftover owner entries: 0")
        .stdout_has("/ limit 2");
}

#[test]
fn simulate_uses_config_file() {
    let temp = Project::empty();
    temp.file("sem.toml", MINIMAL_CONFIG);

    temp.fairsem()
        .args(&["simulate", "--config", "sem.toml", "--workers", "4", "--rounds", "2"])
        .passes()
        .stdout_has("on 'render-farm' (limit 3)")
        .stdout_has("/ limit 3");
}

#[test]
fn simulate_fails_when_workers_give_up() {
    cli()
        .args(&[
            "simulate",
            "--workers",
            "4",
            "--rounds",
            "1",
            "--hold-ms",
            "200",
            "--max-retries",
            "0",
        ])
        .fails()
        .stdout_has("max concurrent: 1 / limit 1")
        .stderr_has("gave up");
}

#[test]
fn simulate_logs_store_calls_when_enabled() {
    cli()
        .args(&["simulate", "--workers", "1", "--rounds", "1"])
        .env("FAIRSEM_LOG", "debug")
        .passes()
        .stderr_has("store.exec")
        .stderr_has("semaphore acquired");
}
