use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .wit/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .wit/refs/heads directory")?;

        // re-running init must not touch an existing HEAD
        let head_path = self.refs().head_path();
        if !head_path.exists() {
            fs::write(&head_path, format!("ref: refs/heads/{DEFAULT_BRANCH}\n"))
                .context("Failed to create initial HEAD reference")?;
        }

        let index = self.index();
        if !index.path().exists() {
            fs::write(index.path(), b"").context("Failed to create .wit/index file")?;
        }

        writeln!(
            self.writer(),
            "Initialized empty wit repository in {}",
            self.path().join(".wit").display()
        )?;

        Ok(())
    }
}
