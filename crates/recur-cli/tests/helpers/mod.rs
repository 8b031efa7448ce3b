use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness running the binary inside an isolated working directory
pub struct CliTestHarness {
    temp_dir: TempDir,
}

impl CliTestHarness {
    /// Create a new test harness with an empty working directory
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("recur").expect("Failed to find recur binary");
        cmd.current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG")
            .env_remove("RECUR_PREVIEW_COUNT")
            .env_remove("RECUR_DATE_FORMAT")
            .env_remove("RECUR_LOG_LEVEL");
        cmd
    }

    /// Write a file into the working directory and return its path
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Second Sunday of every month until mid-year
    pub fn monthly_rule_json() -> &'static str {
        r#"{
            "unit": "month",
            "monthly_pattern": { "kind": "nth_weekday", "position": "second", "weekday": "sunday" },
            "end_date": "2024-06-30"
        }"#
    }

    /// Same rule as TOML
    pub fn monthly_rule_toml() -> &'static str {
        "unit = \"month\"\nend_date = \"2024-06-30\"\n\n[monthly_pattern]\nkind = \"nth_weekday\"\nposition = \"second\"\nweekday = \"sunday\"\n"
    }

    /// Same task as TOML with native datetime values
    pub fn recurring_task_toml() -> &'static str {
        "name = \"Sprint review\"\nplan_start_at = 2024-01-10T09:00:00\nplan_end_at = 2024-01-12T09:00:00\nis_range = true\ntags = [\"work\"]\n\n[recurrence]\nunit = \"day\"\n"
    }

    /// Daily range task spanning two days
    pub fn recurring_task_json() -> &'static str {
        r#"{
            "name": "Sprint review",
            "plan_start_at": "2024-01-10T09:00:00",
            "plan_end_at": "2024-01-12T09:00:00",
            "is_range": true,
            "tags": ["work"],
            "recurrence": { "unit": "day" }
        }"#
    }
}

/// Assertion helpers for common output patterns
pub mod assertions {
    use super::*;

    pub fn no_further_occurrences() -> impl Predicate<str> {
        predicate::str::contains("No further occurrences")
    }

    pub fn invalid_rule() -> impl Predicate<str> {
        predicate::str::contains("Invalid rule")
    }
}
