use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

pub fn run_wit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("wit").expect("wit binary not built");
    cmd.current_dir(dir).args(args);
    cmd
}

/// Commit with a pinned author and date so object ids are reproducible.
pub fn wit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_wit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("WIT_AUTHOR_NAME", &"fake_user".to_string()),
        ("WIT_AUTHOR_EMAIL", &"fake_email@email.com".to_string()),
        ("WIT_AUTHOR_DATE", &"2023-01-01 12:00:00 +0000".to_string()), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Commit with a pinned author and an explicit date, for histories where
/// commit ordering by timestamp matters.
pub fn wit_commit_at(dir: &Path, message: &str, date: &str) -> Command {
    let mut cmd = run_wit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("WIT_AUTHOR_NAME", &"fake_user".to_string()),
        ("WIT_AUTHOR_EMAIL", &"fake_email@email.com".to_string()),
        ("WIT_AUTHOR_DATE", &date.to_string()),
    ]);
    cmd
}

/// Resolve the current HEAD commit id, following a symbolic reference.
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".wit").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".wit").join(ref_path.trim());
        let commit_sha = std::fs::read_to_string(ref_file)?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}
