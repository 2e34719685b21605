//! Workspace migration between two directory snapshots
//!
//! A migration turns the working directory from one flattened tree into an
//! exact mirror of another. Planning and execution are separate steps so
//! conflicts are detected before any change is made:
//!
//! 1. Diff the current snapshot against the target snapshot.
//! 2. Compare every touched path with the live working tree; local content
//!    matching neither side would be silently lost and is a conflict.
//! 3. Apply removals first (pruning emptied directories), then writes.
//!
//! The working tree mirrors the target exactly afterwards: files absent from
//! the target tree are removed, untracked files included.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::WitError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Planned file system operation for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Write the blob's content to the path
    Write(ObjectId),
    /// Remove the file at the path
    Remove,
}

/// Planned transition of the working directory between two snapshots.
#[derive(Debug, Default)]
pub struct Migration {
    changes: BTreeMap<PathBuf, Change>,
    conflicts: Vec<PathBuf>,
}

impl Migration {
    /// Plan the transition from `current` to `target`, checking each touched
    /// path against the live `workspace_state`.
    pub fn plan(
        current: &BTreeMap<PathBuf, ObjectId>,
        target: &BTreeMap<PathBuf, ObjectId>,
        workspace_state: &BTreeMap<PathBuf, ObjectId>,
    ) -> Self {
        let paths: BTreeSet<&PathBuf> = current
            .keys()
            .chain(target.keys())
            .chain(workspace_state.keys())
            .collect();

        let mut migration = Migration::default();

        for path in paths {
            let current_oid = current.get(path);
            let target_oid = target.get(path);
            let workspace_oid = workspace_state.get(path);

            // local content matching neither snapshot would be clobbered
            if let Some(workspace_oid) = workspace_oid
                && Some(workspace_oid) != current_oid
                && Some(workspace_oid) != target_oid
            {
                migration.conflicts.push(path.clone());
            }

            match target_oid {
                Some(target_oid) if workspace_oid != Some(target_oid) => {
                    migration
                        .changes
                        .insert(path.clone(), Change::Write(target_oid.clone()));
                }
                None if workspace_oid.is_some() => {
                    migration.changes.insert(path.clone(), Change::Remove);
                }
                _ => {}
            }
        }

        migration
    }

    /// Paths whose local modifications the migration would overwrite.
    pub fn conflicts(&self) -> &[PathBuf] {
        &self.conflicts
    }

    /// Fail with `CheckoutWouldOverwrite` when local changes are in the way.
    pub fn check_conflicts(&self) -> anyhow::Result<()> {
        if self.conflicts.is_empty() {
            return Ok(());
        }

        Err(WitError::CheckoutWouldOverwrite {
            paths: self.conflicts.clone(),
        }
        .into())
    }

    pub fn changes(&self) -> impl Iterator<Item = (&PathBuf, &Change)> {
        self.changes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Apply the planned operations: removals first so emptied directories
    /// are pruned before new files and directories are created.
    pub fn apply(&self, workspace: &Workspace, database: &Database) -> anyhow::Result<()> {
        for (path, change) in &self.changes {
            if change == &Change::Remove {
                workspace.remove_file(path)?;
            }
        }

        for (path, change) in &self.changes {
            if let Change::Write(oid) = change {
                let blob = database.parse_blob(oid)?;
                workspace.write_file(path, blob.content())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn snapshot(entries: &[(&str, char)]) -> BTreeMap<PathBuf, ObjectId> {
        entries
            .iter()
            .map(|(path, fill)| (PathBuf::from(path), oid(*fill)))
            .collect()
    }

    #[test]
    fn clean_switch_plans_writes_and_removals_without_conflicts() {
        let current = snapshot(&[("a.txt", 'a'), ("b.txt", 'b')]);
        let target = snapshot(&[("a.txt", 'c'), ("d.txt", 'd')]);
        let workspace = current.clone();

        let migration = Migration::plan(&current, &target, &workspace);

        assert!(migration.conflicts().is_empty());
        let changes: Vec<_> = migration.changes().collect();
        assert_eq!(
            changes,
            vec![
                (&PathBuf::from("a.txt"), &Change::Write(oid('c'))),
                (&PathBuf::from("b.txt"), &Change::Remove),
                (&PathBuf::from("d.txt"), &Change::Write(oid('d'))),
            ]
        );
    }

    #[test]
    fn locally_modified_file_conflicts_when_it_matches_neither_side() {
        let current = snapshot(&[("a.txt", 'a')]);
        let target = snapshot(&[("a.txt", 'b')]);
        let workspace = snapshot(&[("a.txt", 'e')]);

        let migration = Migration::plan(&current, &target, &workspace);

        assert_eq!(migration.conflicts(), &[PathBuf::from("a.txt")]);
        assert!(migration.check_conflicts().is_err());
    }

    #[test]
    fn local_edit_already_matching_the_target_is_not_a_conflict() {
        let current = snapshot(&[("a.txt", 'a')]);
        let target = snapshot(&[("a.txt", 'b')]);
        let workspace = snapshot(&[("a.txt", 'b')]);

        let migration = Migration::plan(&current, &target, &workspace);

        assert!(migration.conflicts().is_empty());
        // content is already in place, nothing to write
        assert!(migration.is_empty());
    }

    #[test]
    fn untracked_file_is_removed_but_flagged() {
        let current = snapshot(&[("a.txt", 'a')]);
        let target = snapshot(&[("a.txt", 'a')]);
        let workspace = snapshot(&[("a.txt", 'a'), ("scratch.txt", 'f')]);

        let migration = Migration::plan(&current, &target, &workspace);

        assert_eq!(migration.conflicts(), &[PathBuf::from("scratch.txt")]);
        let changes: Vec<_> = migration.changes().collect();
        assert_eq!(
            changes,
            vec![(&PathBuf::from("scratch.txt"), &Change::Remove)]
        );
    }
}
