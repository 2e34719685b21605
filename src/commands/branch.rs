use crate::areas::refs::{BranchName, HeadState};
use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// With a name, create a branch at the current HEAD commit. Without one,
    /// list all branches, marking the checked-out branch with `*`.
    pub fn branch(&self, name: Option<&str>) -> anyhow::Result<()> {
        match name {
            Some(name) => {
                let branch = BranchName::try_parse(name.to_string())?;
                let head = self
                    .refs()
                    .read_head()?
                    .ok_or_else(|| anyhow::anyhow!("cannot branch before the first commit"))?;

                self.refs().create_branch(&branch, &head)?;
            }
            None => {
                let current = match self.refs().head_state()? {
                    HeadState::Attached(branch) => Some(branch),
                    HeadState::Detached(_) => None,
                };

                for branch in self.refs().list_branches()? {
                    let marker = if Some(&branch) == current.as_ref() {
                        "* "
                    } else {
                        "  "
                    };
                    writeln!(self.writer(), "{marker}{branch}")?;
                }
            }
        }

        Ok(())
    }
}
