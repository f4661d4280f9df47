//! Common test utilities for headless tests.

use std::process::Command;

/// Runs the binary in headless mode with a fixed seed and no user config.
/// Returns (exit code, stdout, stderr).
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_sql-playground"))
        .args(["--headless", "--seed", "5", "--config", "/nonexistent/sql-playground.toml"])
        .args(args)
        .env_remove("SQL_PLAYGROUND_CONFIG")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Runs headless with JSON output and parses stdout.
pub fn run_json(args: &[&str]) -> (i32, serde_json::Value) {
    let mut full: Vec<&str> = args.to_vec();
    full.extend(["--output", "json"]);
    let (code, stdout, stderr) = run_headless(&full);
    let json = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON ({e}):\n{stdout}\nstderr:\n{stderr}"));
    (code, json)
}
