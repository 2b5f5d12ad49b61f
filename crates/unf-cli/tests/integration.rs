//! Integration tests for CLI commands.

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const SAMPLE: &str = "[1.23456789, null, 0]";
const SAMPLE_FINGERPRINT: &str = "UNF:6:Do5dfAoOOFt4FSj0JcByEw==";

fn write_input(contents: &str) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("input.json");
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path.to_str().unwrap().to_string())
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--bin", "unf", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

fn run_cli_with_stdin(args: &[&str], stdin: &str) -> (bool, String, String) {
    let mut child = Command::new("cargo")
        .args(["run", "--quiet", "--bin", "unf", "--"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

#[test]
fn test_fingerprint_file() {
    let (_temp_dir, path) = write_input(SAMPLE);

    let (success, stdout, _) = run_cli(&["fingerprint", &path]);
    assert!(success);
    assert_eq!(stdout.trim(), SAMPLE_FINGERPRINT);
}

#[test]
fn test_fingerprint_stdin() {
    let (success, stdout, _) = run_cli_with_stdin(&["fingerprint"], SAMPLE);
    assert!(success);
    assert_eq!(stdout.trim(), SAMPLE_FINGERPRINT);
}

#[test]
fn test_fingerprint_with_digits() {
    let (_temp_dir, path) = write_input(SAMPLE);

    let (success, stdout, _) = run_cli(&["fingerprint", &path, "--digits", "6"]);
    assert!(success);
    assert_eq!(stdout.trim(), "UNF:6:N6:og3MYuOBULCuTP4lyHZMig==");
}

#[test]
fn test_fingerprint_json_output() {
    let (_temp_dir, path) = write_input(SAMPLE);

    let (success, stdout, _) = run_cli(&["fingerprint", &path, "--json"]);
    assert!(success);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(report["fingerprint"], SAMPLE_FINGERPRINT);
    assert_eq!(report["digest"], "Do5dfAoOOFt4FSj0JcByEw==");
    assert_eq!(report["digits"], 7);
    assert_eq!(report["kind"], "value");
}

#[test]
fn test_fingerprint_object_as_table() {
    let (_temp_dir, path) = write_input(r#"{"n": [1.2345678, null, 3.0], "s": ["a", "b", "c"]}"#);

    let (success, stdout, _) = run_cli(&["fingerprint", &path]);
    assert!(success);
    assert_eq!(stdout.trim(), "UNF:6:8fzS5sw7nFd29ggq9s5drw==");
}

#[test]
fn test_invalid_digits_rejected() {
    let (_temp_dir, path) = write_input(SAMPLE);

    for digits in ["0", "7.5", "seven"] {
        let (success, _, stderr) = run_cli(&["fingerprint", &path, "--digits", digits]);
        assert!(!success, "digits {} should be rejected", digits);
        assert!(stderr.contains("digits"), "unexpected stderr: {}", stderr);
    }
}

#[test]
fn test_nested_input_rejected() {
    let (_temp_dir, path) = write_input("[1, [2, 3]]");

    let (success, _, stderr) = run_cli(&["fingerprint", &path]);
    assert!(!success);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_invalid_json_rejected() {
    let (_temp_dir, path) = write_input("[1, 2");

    let (success, _, stderr) = run_cli(&["digest", &path]);
    assert!(!success);
    assert!(stderr.contains("Invalid JSON"));
}

#[test]
fn test_digest_command() {
    let (_temp_dir, path) = write_input(SAMPLE);

    let (success, stdout, _) = run_cli(&["digest", &path]);
    assert!(success);
    assert_eq!(stdout.trim(), "Do5dfAoOOFt4FSj0JcByEw==");
}

#[test]
fn test_normalize_escaped() {
    let (_temp_dir, path) = write_input(SAMPLE);

    let (success, stdout, _) = run_cli(&["normalize", &path]);
    assert!(success);
    assert_eq!(stdout.trim_end(), r"+1.234568e+\n\0\0\0\0+0.e+\n\0");
}

#[test]
fn test_normalize_raw() {
    let (_temp_dir, path) = write_input(r#"["café", 100]"#);

    let output = Command::new("cargo")
        .args(["run", "--quiet", "--bin", "unf", "--", "normalize", "--raw"])
        .arg(&path)
        .output()
        .expect("Failed to execute CLI");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"caf\xc3\xa9\n\0+1.e+2\n\0".to_vec());
}

#[test]
fn test_normalize_table_rejected() {
    let (_temp_dir, path) = write_input(r#"{"a": [1, 2]}"#);

    let (success, _, stderr) = run_cli(&["normalize", &path]);
    assert!(!success);
    assert!(stderr.contains("Tables"));
}

#[test]
fn test_verify_match() {
    let (_temp_dir, path) = write_input(SAMPLE);

    let (success, stdout, _) = run_cli(&["verify", SAMPLE_FINGERPRINT, &path]);
    assert!(success);
    assert!(stdout.starts_with("OK"));
}

#[test]
fn test_verify_uses_header_digits() {
    let (_temp_dir, path) = write_input(SAMPLE);

    let (success, _, _) = run_cli(&["verify", "UNF:6:N6:og3MYuOBULCuTP4lyHZMig==", &path]);
    assert!(success);
}

#[test]
fn test_verify_mismatch() {
    let (_temp_dir, path) = write_input("[1.23456789, null, 1]");

    let (success, stdout, stderr) = run_cli(&["verify", SAMPLE_FINGERPRINT, &path, "--json"]);
    assert!(!success);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(report["match"], false);
    assert_eq!(report["expected"], SAMPLE_FINGERPRINT);
    assert!(!stderr.contains("Error:"), "mismatch reported twice: {}", stderr);
}

#[test]
fn test_verify_mismatch_reported_once() {
    let (_temp_dir, path) = write_input("[2]");

    let (success, stdout, stderr) = run_cli(&["verify", SAMPLE_FINGERPRINT, &path]);
    assert!(!success);
    assert_eq!(stdout.matches("MISMATCH").count(), 1);
    assert!(stdout.contains(SAMPLE_FINGERPRINT));
    assert!(!stderr.contains("mismatch"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_verify_malformed_fingerprint() {
    let (_temp_dir, path) = write_input(SAMPLE);

    for fingerprint in [
        "UNF:5:Do5dfAoOOFt4FSj0JcByEw==",
        "UNF:6:N7:Do5dfAoOOFt4FSj0JcByEw==",
        "nope",
    ] {
        let (success, _, stderr) = run_cli(&["verify", fingerprint, &path]);
        assert!(!success);
        assert!(stderr.contains("Invalid fingerprint"));
    }
}
