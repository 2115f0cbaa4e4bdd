//! End-to-end tests of the built binary
//!
//! Every run happens in an empty temporary directory with the RAGFLOW_*
//! variables removed, so no local configuration leaks in.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "RAGFLOW_BASE_URL",
    "RAGFLOW_API_KEY",
    "RAGFLOW_TIMEOUT",
    "RAGFLOW_TOP_K",
    "RAGFLOW_SIMILARITY_THRESHOLD",
    "RAGFLOW_VECTOR_WEIGHT",
    "RAGFLOW_CONFIG",
];

fn run_in(dir: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ragflow-search"));
    command.current_dir(dir).args(args).env("NO_COLOR", "1");
    for var in ENV_VARS {
        command.env_remove(var);
    }
    command.output().expect("run ragflow-search")
}

fn run(args: &[&str]) -> (TempDir, Output) {
    let dir = TempDir::new().unwrap();
    let output = run_in(dir.path(), args);
    (dir, output)
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn unused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port())
}

#[test]
fn test_help_lists_commands() {
    let (_dir, output) = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["health", "datasets", "search", "mind-map", "summary", "interactive", "config"] {
        assert!(stdout.contains(command), "missing {} in help", command);
    }
}

#[test]
fn test_health_unreachable_server_is_not_a_failure() {
    let url = unused_url();
    let (_dir, output) = run(&["health", "--url", &url, "--timeout", "2", "--json"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["healthy"], false);
    assert_eq!(json["data"]["url"], url.as_str());
}

#[test]
fn test_config_reports_sources() {
    let (_dir, output) = run(&["config", "--json", "--api-key", "ragflow-secret-wxyz"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    let values = json["data"]["values"].as_array().unwrap();
    let entry = |key: &str| values.iter().find(|v| v["key"] == key).unwrap().clone();

    assert_eq!(entry("base_url")["value"], "http://localhost:9380");
    assert_eq!(entry("base_url")["source"], "default");
    assert_eq!(entry("api_key")["source"], "cli");
    let masked = entry("api_key")["value"].as_str().unwrap().to_string();
    assert!(masked.ends_with("wxyz"));
    assert!(!masked.contains("secret"));
    assert_eq!(json["data"]["config_file"], Value::Null);
}

#[test]
fn test_config_file_in_current_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ragflow.toml"),
        "base_url = \"http://kb.internal:9380\"\n\n[search]\ntop_k = 12\n",
    )
    .unwrap();

    let output = run_in(dir.path(), &["config", "--json"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["data"]["config_file"], "ragflow.toml");
    let values = json["data"]["values"].as_array().unwrap();
    let top_k = values.iter().find(|v| v["key"] == "top_k").unwrap();
    assert_eq!(top_k["value"], "12");
    assert_eq!(top_k["source"], "file");
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ragflow.toml"), "[search]\ntop_k = 99\n").unwrap();

    let output = run_in(dir.path(), &["config"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration: top_k"), "{}", stderr);
}

#[test]
fn test_missing_api_key() {
    let (_dir, output) = run(&["datasets"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No API key configured"), "{}", stderr);
    assert!(stderr.contains("RAGFLOW_API_KEY"), "{}", stderr);
}

#[test]
fn test_errors_as_json() {
    let (_dir, output) = run(&["search", "anything", "--json"]);
    assert!(!output.status.success());

    let json: Value = serde_json::from_slice(&output.stderr).expect("stderr is JSON");
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "No API key configured");
}

#[test]
fn test_unreachable_server_on_search() {
    let url = unused_url();
    let (_dir, output) = run(&["search", "q", "--url", &url, "--api-key", "k", "--timeout", "2"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot reach the RAGFlow server"), "{}", stderr);
}

#[test]
fn test_out_of_range_top_k_is_a_usage_error() {
    let (_dir, output) = run(&["search", "q", "-k", "51"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_interactive_refuses_json() {
    let (_dir, output) = run(&["interactive", "--json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not support --json"), "{}", stderr);
}
