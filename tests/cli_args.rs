//! Integration tests for CLI argument handling
//!
//! Runs the binary for flags that exit before the server starts.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_hivefront"))
        .args(args)
        .env_remove("HIVEFRONT_RETRIES")
        .env_remove("HIVEFRONT_PORT")
        .output()
        .expect("Failed to execute hivefront")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hivefront"), "Help should mention hivefront");
    assert!(stdout.contains("--retries"), "Help should mention --retries");
    assert!(stdout.contains("--node"), "Help should mention --node");
}

#[test]
fn test_version_flag_exits_successfully() {
    let output = run_cli(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hivefront"));
}

#[test]
fn test_zero_retries_prints_error_and_exits() {
    let output = run_cli(&["--retries", "0"]);
    assert!(!output.status.success(), "Expected zero retries to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("retry"),
        "Should print error message about retries: {}",
        stderr
    );
}

#[test]
fn test_non_numeric_port_is_rejected() {
    let output = run_cli(&["--port", "http"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid") || stderr.contains("Invalid"),
        "Should print error message about the port: {}",
        stderr
    );
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use hivefront::cli::{Cli, CliError, ServerConfig};

    #[test]
    fn test_cli_no_args_uses_defaults() {
        let cli = Cli::parse_from(["hivefront"]);
        let config = ServerConfig::from_cli(&cli).expect("Defaults should be valid");
        assert_eq!(config.fetch.retry.max_retries, 3);
        assert_eq!(config.fetch.community_tag, "hive-167922");
    }

    #[test]
    fn test_cli_community_limit_zero_is_invalid() {
        let cli = Cli::parse_from(["hivefront", "--community-limit", "0"]);
        let result = ServerConfig::from_cli(&cli);
        assert!(matches!(result, Err(CliError::InvalidLimit { value: 0, .. })));
    }
}
