//! Command-line behavior of the `export_xlsx` binary.

use super::{counting_query, write_script};
use std::process::{Command, Output};
use tempfile::tempdir;

fn run_binary(dir: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_export_xlsx"))
        .args(args)
        .current_dir(dir)
        .env_remove("EXPORT_XLSX_DATABASE_URL")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_help_prints_usage_and_does_nothing() {
    let dir = tempdir().unwrap();
    let output = run_binary(dir.path(), &["-h", "-l", "sqlite::memory:"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("export_xlsx version"));
    assert!(!dir.path().join("1.xlsx").exists());
}

#[test]
fn test_missing_url_prints_usage_and_does_nothing() {
    let dir = tempdir().unwrap();
    write_script(dir.path(), "SELECT 1");
    let output = run_binary(dir.path(), &["-s", "query.sql"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
    assert!(!dir.path().join("1.xlsx").exists());
}

#[test]
fn test_export_with_default_output_path() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("1.txt"), counting_query(3)).unwrap();
    let output = run_binary(dir.path(), &["-l", "sqlite::memory:"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir.path().join("1.xlsx").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("save file"));
}

#[test]
fn test_unreachable_database_fails_without_output() {
    let dir = tempdir().unwrap();
    write_script(dir.path(), "SELECT 1");
    let url = format!("sqlite://{}", dir.path().join("nope").join("x.db").display());
    let output = run_binary(dir.path(), &["-l", &url, "-s", "query.sql", "-x", "out.xlsx"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("out.xlsx").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Connection Error"));
}

#[test]
fn test_invalid_page_size_is_rejected() {
    let dir = tempdir().unwrap();
    let output = run_binary(dir.path(), &["-l", "sqlite::memory:", "-c", "0"]);

    assert!(!output.status.success());
    assert!(!dir.path().join("1.xlsx").exists());
}
