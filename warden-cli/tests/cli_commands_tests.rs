//! Integration tests for the `warden` binary.
//!
//! Each test writes a control file (and optionally a warden.toml) into a
//! temp dir, runs the binary and checks stdout and the exit code.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const VALID: &str = "\
check process nginx with pidfile /var/run/nginx.pid
  start program = \"/etc/init.d/nginx start\" as uid www and gid www
  if failed port 80 protocol http then restart
  group www

check file nginx_conf path /etc/nginx/nginx.conf
  if changed checksum then alert
";

fn warden(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_warden"))
        .arg("--config")
        .arg(dir.join("warden.toml"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("should run warden binary")
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("should write file");
    path.display().to_string()
}

#[test]
fn test_parse_json_output() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let file = write(temp_dir.path(), "monitrc", VALID);

    let output = warden(temp_dir.path(), &["--output", "json", "parse", &file]);
    assert!(output.status.success(), "parse should succeed");

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let process = &json["model"]["process_checks"][0];
    assert_eq!(process["name"], "nginx");
    assert_eq!(process["pidfile"], "/var/run/nginx.pid");
    assert_eq!(process["start_program"]["path"], "/etc/init.d/nginx start");
    assert_eq!(process["start_program"]["uid"], "www");
    assert_eq!(process["failed_host"]["action"], "restart");
    assert_eq!(json["model"]["file_checks"][0]["if_changed"], "checksum");
}

#[test]
fn test_parse_text_output() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let file = write(temp_dir.path(), "monitrc", VALID);

    let output = warden(temp_dir.path(), &["parse", &file]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 process checks, 1 file checks"));
    assert!(stdout.contains("process nginx (pidfile /var/run/nginx.pid)"));
    assert!(stdout.contains("file nginx_conf (path /etc/nginx/nginx.conf)"));
}

#[test]
fn test_parse_invalid_file_exits_with_parse_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let file = write(temp_dir.path(), "monitrc", "check file conf\n");

    let output = warden(temp_dir.path(), &["parse", &file]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("check file <path> missing"));
}

#[test]
fn test_parse_missing_file_exits_with_io_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let missing = temp_dir.path().join("nope.monitrc");

    let output = warden(temp_dir.path(), &["parse", &missing.display().to_string()]);
    assert_eq!(output.status.code(), Some(10));
}

#[test]
fn test_tokens_json_output_ends_with_eof() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let file = write(temp_dir.path(), "monitrc", "check process abc pidfile /tmp\n");

    let output = warden(temp_dir.path(), &["--output", "json", "tokens", &file]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let tokens = json["tokens"].as_array().expect("tokens array");
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[3]["kind"], "process_pid");
    assert_eq!(tokens[3]["text"], "pidfile /tmp");
    assert_eq!(tokens[4]["kind"], "eof");
}

#[test]
fn test_validate_reports_valid_and_invalid() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let good = write(temp_dir.path(), "good.monitrc", VALID);
    let bad = write(
        temp_dir.path(),
        "bad.monitrc",
        "check process abc\n  if failed port 80 with timeout abc seconds then restart\n",
    );

    let output = warden(temp_dir.path(), &["--output", "json", "validate", &good]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(json["valid"], true);
    assert_eq!(json["process_checks"], 1);
    assert_eq!(json["file_checks"], 1);

    let output = warden(temp_dir.path(), &["--output", "json", "validate", &bad]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(json["valid"], false);
    let error = json["errors"][0].as_str().expect("error message");
    assert!(error.contains("invalid numeric value for timeout: abc"));
}

#[test]
fn test_parser_limits_come_from_config_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write(
        temp_dir.path(),
        "warden.toml",
        "[parser]\nmax_checks = 1\n",
    );
    let file = write(temp_dir.path(), "monitrc", VALID);

    let output = warden(temp_dir.path(), &["validate", &file]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("too many checks: limit is 1"));
}

#[test]
fn test_invalid_config_file_exits_with_config_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write(temp_dir.path(), "warden.toml", "[general]\nlog_level = \"verbose\"\n");
    let file = write(temp_dir.path(), "monitrc", VALID);

    let output = warden(temp_dir.path(), &["parse", &file]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_validate_missing_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let output = warden(temp_dir.path(), &["config", "validate"]);
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("INVALID"));
}

#[test]
fn test_config_show_section() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write(
        temp_dir.path(),
        "warden.toml",
        "[general]\nlog_level = \"warn\"\n\n[parser]\nallow_comments = false\n",
    );

    let output = warden(temp_dir.path(), &["config", "show", "--section", "parser"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("allow_comments = false"));
    assert!(!stdout.contains("log_level"));
}
