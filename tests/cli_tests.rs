//! CLI Integration Tests for Atrium
//!
//! Tests the command-line interface functionality including the init command
//! and the config command.

use std::process::Command;
use tempfile::TempDir;

/// Helper to run atrium-server with arguments
fn run_atrium(args: &[&str], working_dir: Option<&str>) -> std::process::Output {
    let mut cmd = Command::new("cargo");
    cmd.arg("run").arg("--quiet").arg("--").args(args);
    cmd.env("ATRIUM_JWT_SECRET", "test-secret-for-cli-tests");

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    cmd.output().expect("Failed to execute command")
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_atrium(&["--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Atrium"));
    assert!(stdout.contains("USAGE") || stdout.contains("Usage"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_version_command() {
    let output = run_atrium(&["--version"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("atrium-server"));
}

// =============================================================================
// Init Command Tests
// =============================================================================

#[test]
fn test_init_scaffolds_project() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().to_str().expect("utf-8 path");

    let output = run_atrium(&["--no-color", "init"], Some(path));
    assert!(output.status.success());

    assert!(dir.path().join("atrium.toml").exists());
    assert!(dir.path().join(".env.example").exists());
    assert!(dir.path().join(".gitignore").exists());
    assert!(dir.path().join("data").is_dir());

    let toml = std::fs::read_to_string(dir.path().join("atrium.toml")).expect("read toml");
    assert!(toml.contains("jwt_secret_env = \"ATRIUM_JWT_SECRET\""));
    assert!(toml.contains("port = 3000"));
}

#[test]
fn test_init_refuses_existing_project() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().to_str().expect("utf-8 path");

    let output = run_atrium(&["--no-color", "init"], Some(path));
    assert!(output.status.success());

    // Second init without --force fails
    let output = run_atrium(&["--no-color", "init"], Some(path));
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("already exists"));

    // --force succeeds
    let output = run_atrium(&["--no-color", "init", "--force"], Some(path));
    assert!(output.status.success());
}

#[test]
fn test_init_custom_host_port() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().to_str().expect("utf-8 path");

    let output = run_atrium(
        &["--no-color", "init", "--host", "0.0.0.0", "--port", "8080"],
        Some(path),
    );
    assert!(output.status.success());

    let toml = std::fs::read_to_string(dir.path().join("atrium.toml")).expect("read toml");
    assert!(toml.contains("host = \"0.0.0.0\""));
    assert!(toml.contains("port = 8080"));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_validate_on_scaffolded_project() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().to_str().expect("utf-8 path");

    let output = run_atrium(&["--no-color", "init"], Some(path));
    assert!(output.status.success());

    let output = run_atrium(&["--no-color", "config", "--validate"], Some(path));
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
}

#[test]
fn test_config_full_prints_toml() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().to_str().expect("utf-8 path");

    let output = run_atrium(&["--no-color", "init"], Some(path));
    assert!(output.status.success());

    let output = run_atrium(&["--no-color", "config", "--full"], Some(path));
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // The full dump re-renders the loaded config as TOML.
    assert!(stdout.contains("[server]"));
    assert!(stdout.contains("[auth]"));
    assert!(stdout.contains("jwt_secret_env"));
}

#[test]
fn test_config_missing_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().to_str().expect("utf-8 path");

    let output = run_atrium(&["--no-color", "config"], Some(path));
    assert!(!output.status.success());
}
