//! Integration tests for imgsweep CLI

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary with an isolated config directory and no inherited overrides
fn imgsweep(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imgsweep"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG")
        .env_remove("IMGSWEEP_OUTPUT")
        .env_remove("IMGSWEEP_COLOR")
        .env_remove("IMGSWEEP_VAULT")
        .env_remove("IMGSWEEP_CANONICAL_FOLDER")
        .env_remove("IMGSWEEP_COLLISION_POLICY")
        .env_remove("IMGSWEEP_SKIP_HIDDEN")
        .output()
        .expect("Failed to execute imgsweep")
}

fn vault() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("foo.png"), b"png").unwrap();
    fs::write(temp.path().join("bar.jpg"), b"jpg").unwrap();
    fs::write(temp.path().join("note.md"), "# Note\n\n![[foo.png]]\n").unwrap();
    temp
}

#[test]
fn test_cli_version() {
    let home = tempfile::tempdir().unwrap();
    let output = imgsweep(home.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("imgsweep"));
}

#[test]
fn test_cli_help() {
    let home = tempfile::tempdir().unwrap();
    let output = imgsweep(home.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sweep"));
    assert!(stdout.contains("refs"));
}

#[test]
fn test_cli_invalid_command() {
    let home = tempfile::tempdir().unwrap();
    let output = imgsweep(home.path(), &["invalid-command"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_sweep_moves_and_deletes() {
    let home = tempfile::tempdir().unwrap();
    let vault = vault();
    let root = vault.path().to_str().unwrap();

    let output = imgsweep(home.path(), &["--color", "never", "sweep", "--vault", root]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(vault.path().join("images/foo.png").exists());
    assert!(!vault.path().join("foo.png").exists());
    assert!(!vault.path().join("bar.jpg").exists());
    assert!(!vault.path().join("images/bar.jpg").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sweep Summary"));
    assert!(stdout.contains("images/foo.png"));
}

#[test]
fn test_check_changes_nothing() {
    let home = tempfile::tempdir().unwrap();
    let vault = vault();
    let root = vault.path().to_str().unwrap();

    let output = imgsweep(home.path(), &["--json", "sweep", "--check", "--vault", root]);

    assert!(output.status.success());
    assert!(vault.path().join("foo.png").exists());
    assert!(vault.path().join("bar.jpg").exists());
    assert!(!vault.path().join("images").exists());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["type"], "SweepReport");
    assert_eq!(json["data"]["dry_run"], true);
    assert_eq!(json["data"]["deleted"][0], "images/bar.jpg");
}

#[test]
fn test_refs_json() {
    let home = tempfile::tempdir().unwrap();
    let vault = vault();
    fs::write(
        vault.path().join("other.md"),
        "![chart](images/chart.svg)\n![[foo.png|300]]",
    )
    .unwrap();
    let root = vault.path().to_str().unwrap();

    let output = imgsweep(home.path(), &["--json", "refs", "--vault", root]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["type"], "References");
    assert_eq!(
        json["data"]["references"],
        serde_json::json!(["images/chart.svg", "images/foo.png"])
    );
    // listing references never moves anything
    assert!(vault.path().join("foo.png").exists());
}

#[test]
fn test_missing_vault_fails() {
    let home = tempfile::tempdir().unwrap();
    let vault = tempfile::tempdir().unwrap();
    let missing = vault.path().join("absent");

    let output = imgsweep(
        home.path(),
        &["sweep", "--vault", missing.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(!missing.exists());
}

#[test]
fn test_config_file_sets_canonical_folder() {
    let home = tempfile::tempdir().unwrap();
    let vault = vault();
    let config = home.path().join("custom.toml");
    fs::write(&config, "[sweep]\ncanonical_folder = \"assets\"\n").unwrap();

    let output = imgsweep(
        home.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "sweep",
            "--vault",
            vault.path().to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(vault.path().join("assets/foo.png").exists());
    assert!(!vault.path().join("images").exists());
}

#[test]
fn test_spaced_and_escaped_inline_links_survive_sweep() {
    let home = tempfile::tempdir().unwrap();
    let vault = tempfile::tempdir().unwrap();
    fs::write(vault.path().join("my pic.png"), b"png").unwrap();
    fs::write(vault.path().join("Pasted image 1.png"), b"png").unwrap();
    fs::write(
        vault.path().join("note.md"),
        "![shot](my pic.png)\n![](Pasted%20image%201.png)\n",
    )
    .unwrap();

    let output = imgsweep(
        home.path(),
        &["--json", "sweep", "--vault", vault.path().to_str().unwrap()],
    );

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["data"]["deleted"], serde_json::json!([]));
    assert!(vault.path().join("images/my pic.png").exists());
    assert!(vault.path().join("images/Pasted image 1.png").exists());
}
