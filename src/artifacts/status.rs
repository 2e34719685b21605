//! Working tree status
//!
//! Compares the three snapshots a repository maintains (the last commit's
//! tree, the index, and the working tree) and reports the differences
//! between each adjacent pair.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How a path changed between two snapshots.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// Differences between HEAD, index, and working tree.
#[derive(Debug, Default)]
pub struct StatusReport {
    /// Index vs the last commit's tree.
    pub changes_to_commit: BTreeMap<PathBuf, ChangeKind>,
    /// Working tree vs the index, over indexed paths.
    pub changes_not_staged: BTreeMap<PathBuf, ChangeKind>,
    /// Working tree paths the index does not track.
    pub untracked: Vec<PathBuf>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.changes_to_commit.is_empty()
            && self.changes_not_staged.is_empty()
            && self.untracked.is_empty()
    }
}

/// Builds a status report from the three snapshots.
pub fn compute(
    head_tree: &BTreeMap<PathBuf, ObjectId>,
    index: &BTreeMap<PathBuf, ObjectId>,
    workspace: &BTreeMap<PathBuf, ObjectId>,
) -> StatusReport {
    let mut report = StatusReport::default();

    for (path, oid) in index {
        match head_tree.get(path) {
            None => {
                report
                    .changes_to_commit
                    .insert(path.clone(), ChangeKind::Added);
            }
            Some(head_oid) if head_oid != oid => {
                report
                    .changes_to_commit
                    .insert(path.clone(), ChangeKind::Modified);
            }
            Some(_) => {}
        }

        match workspace.get(path) {
            None => {
                report
                    .changes_not_staged
                    .insert(path.clone(), ChangeKind::Deleted);
            }
            Some(workspace_oid) if workspace_oid != oid => {
                report
                    .changes_not_staged
                    .insert(path.clone(), ChangeKind::Modified);
            }
            Some(_) => {}
        }
    }

    for path in head_tree.keys() {
        if !index.contains_key(path) {
            report
                .changes_to_commit
                .insert(path.clone(), ChangeKind::Deleted);
        }
    }

    report.untracked = workspace
        .keys()
        .filter(|path| !index.contains_key(*path))
        .cloned()
        .collect();

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(seed: u8) -> ObjectId {
        ObjectId::try_parse(format!("{seed:02x}").repeat(20)).unwrap()
    }

    fn snapshot(entries: &[(&str, u8)]) -> BTreeMap<PathBuf, ObjectId> {
        entries
            .iter()
            .map(|(path, seed)| (PathBuf::from(path), oid(*seed)))
            .collect()
    }

    #[test]
    fn identical_snapshots_are_clean() {
        let state = snapshot(&[("a.txt", 1)]);
        let report = compute(&state, &state, &state);

        assert!(report.is_clean());
    }

    #[test]
    fn staged_changes_are_reported_against_head() {
        let head = snapshot(&[("kept.txt", 1), ("edited.txt", 2), ("dropped.txt", 3)]);
        let index = snapshot(&[("kept.txt", 1), ("edited.txt", 4), ("new.txt", 5)]);

        let report = compute(&head, &index, &index);

        assert_eq!(
            report.changes_to_commit,
            BTreeMap::from([
                (PathBuf::from("edited.txt"), ChangeKind::Modified),
                (PathBuf::from("new.txt"), ChangeKind::Added),
                (PathBuf::from("dropped.txt"), ChangeKind::Deleted),
            ])
        );
        assert!(report.changes_not_staged.is_empty());
    }

    #[test]
    fn workspace_edits_and_deletions_are_unstaged_changes() {
        let index = snapshot(&[("edited.txt", 1), ("deleted.txt", 2)]);
        let workspace = snapshot(&[("edited.txt", 3)]);

        let report = compute(&index, &index, &workspace);

        assert_eq!(
            report.changes_not_staged,
            BTreeMap::from([
                (PathBuf::from("edited.txt"), ChangeKind::Modified),
                (PathBuf::from("deleted.txt"), ChangeKind::Deleted),
            ])
        );
    }

    #[test]
    fn unindexed_workspace_files_are_untracked() {
        let tracked = snapshot(&[("tracked.txt", 1)]);
        let workspace = snapshot(&[("tracked.txt", 1), ("scratch.txt", 2)]);

        let report = compute(&tracked, &tracked, &workspace);

        assert_eq!(report.untracked, vec![PathBuf::from("scratch.txt")]);
    }
}
