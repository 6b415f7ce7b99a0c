//! End-to-end CLI tests for the civitai binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn civitai() -> Command {
    let mut cmd = Command::cargo_bin("civitai").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("CIVITAI_API_KEY");
    cmd
}

/// Writes a config rooted at `workspace` and returns its path.
fn write_config(workspace: &TempDir, extra: &str) -> std::path::PathBuf {
    let path = workspace.path().join("config.toml");
    let body = format!(
        "workspace = {:?}\napi_base_url = \"http://127.0.0.1:9\"\n{extra}",
        workspace.path().display().to_string()
    );
    std::fs::write(&path, body).unwrap();
    path
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    civitai()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve, download, and organize"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("audit"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    civitai()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    civitai()
        .args(["--invalid-flag", "extract"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_missing_subcommand_fails() {
    civitai().assert().failure();
}

#[test]
fn test_audit_without_duplicates_succeeds() {
    let workspace = TempDir::new().unwrap();
    let config = write_config(&workspace, "");
    std::fs::create_dir_all(workspace.path().join("loras/pony")).unwrap();
    std::fs::write(workspace.path().join("loras/pony/new.safetensors"), b"x").unwrap();
    std::fs::write(workspace.path().join("pony.txt"), "old.safetensors\n").unwrap();

    civitai()
        .arg("--config")
        .arg(&config)
        .args(["-q", "audit", "--target", "pony"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No duplicates found."));
}

#[test]
fn test_audit_missing_folder_reports_and_exits_zero() {
    let workspace = TempDir::new().unwrap();
    let config = write_config(&workspace, "");
    std::fs::write(workspace.path().join("flux.txt"), "a.safetensors\n").unwrap();

    civitai()
        .arg("--config")
        .arg(&config)
        .args(["audit", "--target", "flux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("folder not found"));
}

#[test]
fn test_extract_missing_pending_list_fails() {
    let workspace = TempDir::new().unwrap();
    let config = write_config(&workspace, "");

    civitai()
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .assert()
        .failure()
        .stderr(predicate::str::contains("urls.txt"));
}

#[test]
fn test_unknown_config_key_fails() {
    let workspace = TempDir::new().unwrap();
    let config = write_config(&workspace, "bogus_key = 1\n");

    civitai()
        .arg("--config")
        .arg(&config)
        .args(["audit", "--target", "pony"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_explicit_missing_config_fails() {
    let workspace = TempDir::new().unwrap();
    civitai()
        .arg("--config")
        .arg(workspace.path().join("absent.toml"))
        .arg("extract")
        .assert()
        .failure();
}
