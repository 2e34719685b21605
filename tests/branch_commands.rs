use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{repository_dir, run_wit_command, wit_commit};
use common::file::{FileSpec, write_file};

fn commit_once(dir: &std::path::Path) {
    write_file(FileSpec::new(dir.join("a.txt"), "one".to_string()));
    run_wit_command(dir, &["add", "."]).assert().success();
    wit_commit(dir, "first").assert().success();
}

#[rstest]
fn a_new_branch_points_at_the_current_commit(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();
    commit_once(dir.path());

    run_wit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    let head = common::command::get_head_commit_sha(dir.path()).unwrap();
    let branch_ref = std::fs::read_to_string(
        dir.path()
            .join(".wit")
            .join("refs")
            .join("heads")
            .join("feature"),
    )
    .unwrap();
    assert_eq!(branch_ref.trim(), head);
}

#[rstest]
fn listing_marks_the_current_branch(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();
    commit_once(dir.path());

    run_wit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    run_wit_command(dir.path(), &["branch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* master"))
        .stdout(predicate::str::contains("  feature"));
}

#[rstest]
fn branching_before_the_first_commit_fails(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    run_wit_command(dir.path(), &["branch", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("first commit"));
}

#[rstest]
fn duplicate_branch_names_are_rejected(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();
    commit_once(dir.path());

    run_wit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    run_wit_command(dir.path(), &["branch", "feature"])
        .assert()
        .failure();
}

#[rstest]
#[case("..dots")]
#[case("name.lock")]
#[case("spa ce")]
fn invalid_branch_names_are_rejected(repository_dir: TempDir, #[case] name: &str) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();
    commit_once(dir.path());

    run_wit_command(dir.path(), &["branch", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid branch name"));
}
