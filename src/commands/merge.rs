use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::ancestor::AncestorFinder;
use crate::artifacts::merge::three_way::{self, ConflictEntry};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::WitError;
use std::io::Write;
use std::path::PathBuf;

/// How a merge ended. Conflicts are a reportable outcome, not an error:
/// the repository is left in a resolvable state either way.
#[derive(Debug)]
pub enum MergeOutcome {
    /// The other commit is already reachable from HEAD.
    AlreadyUpToDate,
    /// HEAD was behind the other commit and was moved forward to it.
    FastForward(ObjectId),
    /// A new merge commit with two parents was created.
    Merged(ObjectId),
    /// The merge stopped on conflicts; no commit was created.
    Conflicted(ConflictReport),
}

/// Paths left with conflict markers for manual resolution.
#[derive(Debug)]
pub struct ConflictReport {
    paths: Vec<PathBuf>,
}

impl ConflictReport {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Repository {
    /// Merge another branch or commit into the current HEAD.
    ///
    /// Trivial cases short-circuit: an already-reachable target is a no-op,
    /// and a target ahead of HEAD fast-forwards without creating a commit.
    /// Otherwise each file is reconciled three-way against the nearest
    /// common ancestor; conflicting files are written with conflict markers
    /// and reported instead of committed.
    pub fn merge(&self, target: &str, message: Option<&str>) -> anyhow::Result<MergeOutcome> {
        let head_oid = self
            .refs()
            .read_head()?
            .ok_or_else(|| anyhow::anyhow!("cannot merge before the first commit"))?;
        let other_oid = self.resolve_ref(target)?;

        let finder = AncestorFinder::new(|oid: &ObjectId| self.database().slim_commit(oid));
        let ancestor_oid = finder
            .find(&head_oid, &other_oid)?
            .ok_or(WitError::UnrelatedHistories)?;

        if ancestor_oid == other_oid {
            writeln!(self.writer(), "Already up to date")?;
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        if ancestor_oid == head_oid {
            return self.fast_forward(&head_oid, &other_oid);
        }

        let base = self.database().flatten_commit(&ancestor_oid)?;
        let ours = self.database().flatten_commit(&head_oid)?;
        let theirs = self.database().flatten_commit(&other_oid)?;

        let merged = three_way::resolve(&base, &ours, &theirs);

        // materialize the clean part of the result; conflicted paths are
        // dropped here and rewritten with markers below
        let migration = Migration::plan(&ours, merged.entries(), &self.workspace().snapshot()?);
        migration.check_conflicts()?;
        migration.apply(self.workspace(), self.database())?;

        let mut index = self.index();
        index.rehydrate()?;
        index.load_from_tree(merged.entries().clone());

        if merged.has_conflicts() {
            for conflict in merged.conflicts() {
                self.write_conflict_markers(conflict, target)?;
                // resolution stays unstaged: the index keeps our pre-merge
                // side until the user resolves and re-adds the file
                if let Some(our_oid) = &conflict.ours {
                    index.add(conflict.path.clone(), our_oid.clone());
                }
            }
            index.write_updates()?;
            drop(index);

            let paths: Vec<PathBuf> = merged
                .conflicts()
                .iter()
                .map(|conflict| conflict.path.clone())
                .collect();
            for path in &paths {
                writeln!(
                    self.writer(),
                    "CONFLICT (content): merge conflict in {}",
                    path.display()
                )?;
            }
            writeln!(
                self.writer(),
                "Automatic merge failed; fix conflicts and then commit the result"
            )?;

            return Ok(MergeOutcome::Conflicted(ConflictReport { paths }));
        }

        index.write_updates()?;
        drop(index);

        let message = match message {
            Some(message) => message.to_string(),
            None => match self.refs().head_state()? {
                HeadState::Attached(branch) => format!("Merge '{target}' into {branch}"),
                HeadState::Detached(_) => format!("Merge '{target}'"),
            },
        };
        let tree = Tree::build(merged.entries().iter())?;
        let (commit_id, commit) = self.write_commit(tree, vec![head_oid, other_oid], &message)?;

        writeln!(
            self.writer(),
            "[{}] {}",
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(MergeOutcome::Merged(commit_id))
    }

    fn fast_forward(
        &self,
        head_oid: &ObjectId,
        other_oid: &ObjectId,
    ) -> anyhow::Result<MergeOutcome> {
        let current = self.database().flatten_commit(head_oid)?;
        let desired = self.database().flatten_commit(other_oid)?;

        let migration = Migration::plan(&current, &desired, &self.workspace().snapshot()?);
        migration.check_conflicts()?;
        migration.apply(self.workspace(), self.database())?;

        let mut index = self.index();
        index.rehydrate()?;
        index.load_from_tree(desired);
        index.write_updates()?;
        drop(index);

        self.refs().update_head(other_oid)?;

        writeln!(
            self.writer(),
            "Updating {}..{}\nFast-forward",
            head_oid.to_short_oid(),
            other_oid.to_short_oid()
        )?;

        Ok(MergeOutcome::FastForward(other_oid.clone()))
    }

    /// Write a conflicted file with both versions delimited by markers. A
    /// side that deleted the file contributes an empty section.
    fn write_conflict_markers(&self, conflict: &ConflictEntry, target: &str) -> anyhow::Result<()> {
        let our_content = match &conflict.ours {
            Some(oid) => with_trailing_newline(self.database().parse_blob(oid)?.content()),
            None => String::new(),
        };
        let their_content = match &conflict.theirs {
            Some(oid) => with_trailing_newline(self.database().parse_blob(oid)?.content()),
            None => String::new(),
        };

        let path = conflict.path.display();
        let content = format!(
            "<<<<<<< HEAD:{path}\n{our_content}=======\n{their_content}>>>>>>> {target}:{path}\n",
        );

        self.workspace().write_file(&conflict.path, &content)
    }
}

fn with_trailing_newline(content: &str) -> String {
    if content.is_empty() || content.ends_with('\n') {
        content.to_string()
    } else {
        format!("{content}\n")
    }
}
