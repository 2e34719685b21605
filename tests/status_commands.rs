use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{repository_dir, run_wit_command, wit_commit};
use common::file::{FileSpec, write_file};

fn status_output(dir: &std::path::Path) -> String {
    let output = run_wit_command(dir, &["status"])
        .env("NO_COLOR", "1")
        .output()
        .expect("status failed to run");
    assert!(output.status.success());
    String::from_utf8(output.stdout).expect("status output is not utf-8")
}

#[rstest]
fn a_fresh_commit_leaves_a_clean_tree(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "first").assert().success();

    let output = status_output(dir.path());
    assert!(output.contains("On branch master"));
    assert!(output.contains("nothing to commit, working tree clean"));
}

#[rstest]
fn staged_files_show_as_changes_to_commit(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();

    let output = status_output(dir.path());
    assert!(output.contains("Changes to be committed:"));
    assert!(output.contains("added: a.txt"));
}

#[rstest]
fn edited_and_deleted_files_show_as_unstaged_changes(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("edited.txt"), "one".to_string()));
    write_file(FileSpec::new(dir.path().join("deleted.txt"), "two".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "first").assert().success();

    write_file(FileSpec::new(dir.path().join("edited.txt"), "changed".to_string()));
    std::fs::remove_file(dir.path().join("deleted.txt")).unwrap();

    let output = status_output(dir.path());
    assert!(output.contains("Changes not staged for commit:"));
    assert!(output.contains("modified: edited.txt"));
    assert!(output.contains("deleted: deleted.txt"));
}

#[rstest]
fn unstaged_files_show_as_untracked(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "first").assert().success();

    write_file(FileSpec::new(dir.path().join("scratch.txt"), "tmp".to_string()));

    let output = status_output(dir.path());
    assert!(output.contains("Untracked files:"));
    assert!(output.contains("scratch.txt"));
}

#[rstest]
fn a_detached_head_is_reported(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "first").assert().success();

    let head = common::command::get_head_commit_sha(dir.path()).unwrap();
    run_wit_command(dir.path(), &["checkout", &head])
        .assert()
        .success();

    run_wit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HEAD detached at"));
}
