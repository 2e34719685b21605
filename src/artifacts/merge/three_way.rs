//! Three-way snapshot reconciliation
//!
//! Compares two divergent flat snapshots against their common base, path by
//! path, and classifies every path as either cleanly resolved or conflicted.
//! A side that left a path untouched since the base yields to the side that
//! changed it; when both sides changed the same path to different contents
//! (including deleting it on one side only) the path is a conflict and the
//! caller decides how to materialize it.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// A path both sides changed since the base, in incompatible ways.
///
/// `None` on a side means that side deleted the file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ConflictEntry {
    pub path: PathBuf,
    pub ours: Option<ObjectId>,
    pub theirs: Option<ObjectId>,
}

/// Result of reconciling two snapshots against their base.
#[derive(Debug, Default)]
pub struct MergedTree {
    entries: BTreeMap<PathBuf, ObjectId>,
    conflicts: Vec<ConflictEntry>,
}

impl MergedTree {
    /// Cleanly resolved paths and their blob ids.
    pub fn entries(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.entries
    }

    /// Paths needing manual resolution, in path order.
    pub fn conflicts(&self) -> &[ConflictEntry] {
        &self.conflicts
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Reconciles `ours` and `theirs` against `base`, path by path.
///
/// For each path in the union of the three snapshots:
/// - both sides agree: keep the shared entry (absent on both stays absent)
/// - only one side differs from the base: take the changed side
/// - both sides differ from the base and from each other: conflict
pub fn resolve(
    base: &BTreeMap<PathBuf, ObjectId>,
    ours: &BTreeMap<PathBuf, ObjectId>,
    theirs: &BTreeMap<PathBuf, ObjectId>,
) -> MergedTree {
    let paths: BTreeSet<&PathBuf> = base
        .keys()
        .chain(ours.keys())
        .chain(theirs.keys())
        .collect();

    let mut merged = MergedTree::default();

    for path in paths {
        let base_oid = base.get(path);
        let our_oid = ours.get(path);
        let their_oid = theirs.get(path);

        let resolution = if our_oid == their_oid {
            our_oid
        } else if our_oid == base_oid {
            their_oid
        } else if their_oid == base_oid {
            our_oid
        } else {
            merged.conflicts.push(ConflictEntry {
                path: path.clone(),
                ours: our_oid.cloned(),
                theirs: their_oid.cloned(),
            });
            continue;
        };

        if let Some(oid) = resolution {
            merged.entries.insert(path.clone(), oid.clone());
        }
    }

    merged
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
    fn unchanged_paths_are_kept() {
        let base = snapshot(&[("a.txt", 1)]);
        let merged = resolve(&base, &base, &base);

        assert_eq!(merged.entries(), &base);
        assert!(!merged.has_conflicts());
    }

    #[test]
    fn one_sided_edits_are_taken() {
        let base = snapshot(&[("a.txt", 1), ("b.txt", 2)]);
        let ours = snapshot(&[("a.txt", 3), ("b.txt", 2)]);
        let theirs = snapshot(&[("a.txt", 1), ("b.txt", 4)]);

        let merged = resolve(&base, &ours, &theirs);

        assert_eq!(merged.entries(), &snapshot(&[("a.txt", 3), ("b.txt", 4)]));
        assert!(!merged.has_conflicts());
    }

    #[test]
    fn additions_on_either_side_are_taken() {
        let base = snapshot(&[]);
        let ours = snapshot(&[("ours.txt", 1)]);
        let theirs = snapshot(&[("theirs.txt", 2)]);

        let merged = resolve(&base, &ours, &theirs);

        assert_eq!(
            merged.entries(),
            &snapshot(&[("ours.txt", 1), ("theirs.txt", 2)])
        );
        assert!(!merged.has_conflicts());
    }

    #[test]
    fn one_sided_deletion_is_taken() {
        let base = snapshot(&[("a.txt", 1)]);
        let ours = snapshot(&[]);
        let theirs = snapshot(&[("a.txt", 1)]);

        let merged = resolve(&base, &ours, &theirs);

        assert!(merged.entries().is_empty());
        assert!(!merged.has_conflicts());
    }

    #[test]
    fn identical_changes_on_both_sides_merge_cleanly() {
        let base = snapshot(&[("a.txt", 1)]);
        let both = snapshot(&[("a.txt", 2)]);

        let merged = resolve(&base, &both, &both);

        assert_eq!(merged.entries(), &both);
        assert!(!merged.has_conflicts());
    }

    #[test]
    fn divergent_edits_conflict() {
        let base = snapshot(&[("a.txt", 1)]);
        let ours = snapshot(&[("a.txt", 2)]);
        let theirs = snapshot(&[("a.txt", 3)]);

        let merged = resolve(&base, &ours, &theirs);

        assert!(merged.entries().is_empty());
        assert_eq!(
            merged.conflicts(),
            &[ConflictEntry {
                path: PathBuf::from("a.txt"),
                ours: Some(oid(2)),
                theirs: Some(oid(3)),
            }]
        );
    }

    #[test]
    fn add_add_with_different_contents_conflicts() {
        let base = snapshot(&[]);
        let ours = snapshot(&[("new.txt", 1)]);
        let theirs = snapshot(&[("new.txt", 2)]);

        let merged = resolve(&base, &ours, &theirs);

        assert_eq!(merged.conflicts().len(), 1);
        assert_eq!(merged.conflicts()[0].ours, Some(oid(1)));
        assert_eq!(merged.conflicts()[0].theirs, Some(oid(2)));
    }

    #[test]
    fn modify_delete_conflicts() {
        let base = snapshot(&[("a.txt", 1)]);
        let ours = snapshot(&[("a.txt", 2)]);
        let theirs = snapshot(&[]);

        let merged = resolve(&base, &ours, &theirs);

        assert_eq!(
            merged.conflicts(),
            &[ConflictEntry {
                path: PathBuf::from("a.txt"),
                ours: Some(oid(2)),
                theirs: None,
            }]
        );
    }
}
