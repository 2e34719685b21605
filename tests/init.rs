use assert_cmd::Command;
use predicates::prelude::predicate;

mod common;

#[test]
fn new_repository_initiated_with_wit_directory() -> Result<(), Box<dyn std::error::Error>> {
    common::redirect_temp_dir();
    let dir = assert_fs::TempDir::new()?;
    let dir_absolute_path = dir.path().canonicalize()?.display().to_string();
    let mut sut = Command::cargo_bin("wit")?;

    sut.arg("init").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty wit repository in .+\n$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    assert!(dir.path().join(".wit").join("objects").is_dir());
    assert!(
        dir.path()
            .join(".wit")
            .join("refs")
            .join("heads")
            .is_dir()
    );
    assert!(dir.path().join(".wit").join("index").is_file());

    let head = std::fs::read_to_string(dir.path().join(".wit").join("HEAD"))?;
    assert_eq!(head.trim(), "ref: refs/heads/master");

    Ok(())
}

#[test]
fn init_in_current_directory_without_a_path() -> Result<(), Box<dyn std::error::Error>> {
    common::redirect_temp_dir();
    let dir = assert_fs::TempDir::new()?;
    let mut sut = Command::cargo_bin("wit")?;

    sut.current_dir(dir.path()).arg("init");

    sut.assert().success();
    assert!(dir.path().join(".wit").is_dir());

    Ok(())
}
