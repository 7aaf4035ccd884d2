use std::process::{Command, Output};

fn wolfgang(dir: &tempfile::TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wolfgang"))
        .args(args)
        .current_dir(dir.path())
        .env("WOLFGANG__DATABASE_PATH", dir.path().join("wolfgang.db"))
        .env("WOLFGANG__FETCH__TIMEOUT_SECS", "5")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run wolfgang")
}

#[test]
fn test_add_unreachable_page_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = wolfgang(&dir, &["add", "http://127.0.0.1:1/recipe"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(wolfgang::error::UNREADABLE_RECIPE));
}

#[test]
fn test_list_empty_store_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let output = wolfgang(&dir, &["list"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No saved recipes yet."));
}

#[test]
fn test_missing_item_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = wolfgang(&dir, &["check", "42"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unknown_command_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = wolfgang(&dir, &["bake"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: wolfgang"));
}
