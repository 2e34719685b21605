use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::WitError;
use std::io::Write;

impl Repository {
    /// Record the staged snapshot as a new commit on the current branch.
    ///
    /// Refuses to create a commit whose tree is identical to its parent's:
    /// content addressing makes the root tree id a digest of the whole
    /// snapshot, so equal ids mean nothing changed.
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let parent = self.refs().read_head()?;

        if index.is_empty() && parent.is_none() {
            return Err(WitError::NothingToCommit.into());
        }

        let tree = Tree::build(index.entries())?;
        let tree_id = tree.object_id()?;

        if let Some(parent_oid) = &parent
            && self.database().parse_commit(parent_oid)?.tree_oid() == &tree_id
        {
            return Err(WitError::NothingToCommit.into());
        }
        drop(index);

        let parents: Vec<ObjectId> = parent.into_iter().collect();
        let (commit_id, commit) = self.write_commit(tree, parents, message)?;

        let is_root = if commit.parents().is_empty() {
            "(root-commit) "
        } else {
            ""
        };

        writeln!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }

    /// Store a tree and a commit pointing at it, then advance HEAD. Shared
    /// by `commit` and `merge`.
    pub(crate) fn write_commit(
        &self,
        tree: Tree,
        parents: Vec<ObjectId>,
        message: &str,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        tree.traverse(&|subtree: &Tree| self.database().store(subtree))?;
        let tree_id = tree.object_id()?;

        let author = Author::load_from_env();
        let commit = Commit::new(parents, tree_id, author, message.trim().to_string());
        let commit_id = commit.object_id()?;

        self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;

        Ok((commit_id, commit))
    }
}
