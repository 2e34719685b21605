use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{get_head_commit_sha, repository_dir, run_wit_command, wit_commit};
use common::file::{FileSpec, write_file};

#[rstest]
fn first_commit_is_a_root_commit(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();

    wit_commit(dir.path(), "Initial commit")
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^\[\(root-commit\) [0-9a-f]{7}\] Initial commit\n$",
        ).unwrap());

    let head = get_head_commit_sha(dir.path()).unwrap();
    assert_eq!(head.len(), 40);
}

#[rstest]
fn second_commit_references_its_parent(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "first").assert().success();
    let first = get_head_commit_sha(dir.path()).unwrap();

    write_file(FileSpec::new(dir.path().join("a.txt"), "two".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "second")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[[0-9a-f]{7}\] second\n$").unwrap());

    let second = get_head_commit_sha(dir.path()).unwrap();
    assert_ne!(first, second);
}

#[rstest]
fn committing_with_nothing_staged_fails(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    wit_commit(dir.path(), "empty")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[rstest]
fn committing_an_unchanged_snapshot_fails(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "first").assert().success();
    let head_before = get_head_commit_sha(dir.path()).unwrap();

    // re-staging identical content leaves the tree id unchanged
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "no change")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));

    assert_eq!(get_head_commit_sha(dir.path()).unwrap(), head_before);
}

#[rstest]
fn identical_snapshots_share_their_tree_objects(repository_dir: TempDir) {
    let dir = repository_dir;
    run_wit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.path().join("a").join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(dir.path().join("2.txt"), "two".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "first").assert().success();

    let count_objects = || {
        walkdir::WalkDir::new(dir.path().join(".wit").join("objects"))
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .count()
    };
    let after_first = count_objects();

    // an untouched subdirectory reuses its stored tree in the next commit
    write_file(FileSpec::new(dir.path().join("2.txt"), "three".to_string()));
    run_wit_command(dir.path(), &["add", "."]).assert().success();
    wit_commit(dir.path(), "second").assert().success();

    // one new blob, one new root tree, one new commit; `a` is shared
    assert_eq!(count_objects(), after_first + 3);
}
