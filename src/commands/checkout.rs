use crate::areas::refs::BranchName;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use std::io::Write;

impl Repository {
    /// Switch the working tree to another branch or commit.
    ///
    /// The working tree becomes an exact mirror of the target snapshot and
    /// the index is reloaded from it. Local content that matches neither the
    /// current nor the target snapshot blocks the switch unless `force` is
    /// given.
    pub fn checkout(&self, target: &str, force: bool) -> anyhow::Result<()> {
        let target_oid = self.resolve_ref(target)?;

        let current = match self.refs().read_head()? {
            Some(head_oid) => self.database().flatten_commit(&head_oid)?,
            None => Default::default(),
        };
        let desired = self.database().flatten_commit(&target_oid)?;

        let migration = Migration::plan(&current, &desired, &self.workspace().snapshot()?);
        if !force {
            migration.check_conflicts()?;
        }
        migration.apply(self.workspace(), self.database())?;

        let mut index = self.index();
        index.rehydrate()?;
        index.load_from_tree(desired);
        index.write_updates()?;
        drop(index);

        // a branch name attaches HEAD; a commit id detaches it
        if let Ok(branch) = BranchName::try_parse(target.to_string())
            && self.refs().branch_exists(&branch)
        {
            self.refs().attach_head(&branch)?;
            writeln!(self.writer(), "Switched to branch '{branch}'")?;
        } else {
            self.refs().detach_head(&target_oid)?;
            writeln!(
                self.writer(),
                "HEAD is now detached at {}",
                target_oid.to_short_oid()
            )?;
            writeln!(
                self.writer(),
                "Note: commits made now will not belong to any branch"
            )?;
        }

        Ok(())
    }
}
