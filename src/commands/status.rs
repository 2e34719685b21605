use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::status;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Show the current branch and the differences between HEAD, the index,
    /// and the working tree.
    pub fn status(&self) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;
        let staged = index.entries().map(|(p, o)| (p.clone(), o.clone())).collect();
        drop(index);

        let head_tree = match self.refs().read_head()? {
            Some(head_oid) => self.database().flatten_commit(&head_oid)?,
            None => Default::default(),
        };

        let report = status::compute(&head_tree, &staged, &self.workspace().snapshot()?);

        match self.refs().head_state()? {
            HeadState::Attached(branch) => {
                writeln!(self.writer(), "On branch {branch}")?;
            }
            HeadState::Detached(oid) => {
                writeln!(self.writer(), "HEAD detached at {}", oid.to_short_oid())?;
            }
        }

        if !report.changes_to_commit.is_empty() {
            writeln!(self.writer(), "\nChanges to be committed:")?;
            for (path, kind) in &report.changes_to_commit {
                writeln!(
                    self.writer(),
                    "\t{}",
                    format!("{}: {}", kind.as_str(), path.display()).green()
                )?;
            }
        }

        if !report.changes_not_staged.is_empty() {
            writeln!(self.writer(), "\nChanges not staged for commit:")?;
            for (path, kind) in &report.changes_not_staged {
                writeln!(
                    self.writer(),
                    "\t{}",
                    format!("{}: {}", kind.as_str(), path.display()).red()
                )?;
            }
        }

        if !report.untracked.is_empty() {
            writeln!(self.writer(), "\nUntracked files:")?;
            for path in &report.untracked {
                writeln!(self.writer(), "\t{}", path.display().to_string().red())?;
            }
        }

        if report.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
        }

        Ok(())
    }
}
