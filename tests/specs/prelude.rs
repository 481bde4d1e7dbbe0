//! Shared helpers for CLI specs

#![allow(dead_code)]

use assert_cmd::Command;
pub use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Minimal valid semaphore config
pub const MINIMAL_CONFIG: &str = r#"
name = "render-farm"
limit = 3
timeout = "30s"
"#;

/// Scratch directory to hold config files
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `rel` inside the project
    pub fn file(&self, rel: &str, contents: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// `fairsem` invocation running inside the project
    pub fn fairsem(&self) -> Cli {
        let mut cmd = fairsem_cmd();
        cmd.current_dir(self.path());
        Cli { cmd }
    }
}

/// `fairsem` invocation with no project
pub fn cli() -> Cli {
    Cli { cmd: fairsem_cmd() }
}

fn fairsem_cmd() -> Command {
    let mut cmd = Command::cargo_bin("fairsem").unwrap();
    cmd.env_remove("FAIRSEM_LOG");
    cmd
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Raw `assert_cmd` assertion, for predicate-based checks
    pub fn assert(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert()
    }

    /// Run and assert a zero exit
    pub fn passes(mut self) -> RunOutput {
        let output = self.cmd.output().unwrap();
        let run = RunOutput::from(output);
        assert!(
            run.success,
            "expected success\nstdout:\n{}\nstderr:\n{}",
            run.stdout, run.stderr
        );
        run
    }

    /// Run and assert a non-zero exit
    pub fn fails(mut self) -> RunOutput {
        let output = self.cmd.output().unwrap();
        let run = RunOutput::from(output);
        assert!(
            !run.success,
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            run.stdout, run.stderr
        );
        run
    }
}

pub struct RunOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

impl From<std::process::Output> for RunOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl RunOutput {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        assert!(
            self.stdout.contains(expected),
            "stdout missing {:?}\nstdout:\n{}",
            expected,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        assert!(
            self.stderr.contains(expected),
            "stderr missing {:?}\nstderr:\n{}",
            expected,
            self.stderr
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        assert!(
            !self.stdout.contains(unexpected),
            "stdout unexpectedly has {:?}\nstdout:\n{}",
            unexpected,
            self.stdout
        );
        self
    }
}
