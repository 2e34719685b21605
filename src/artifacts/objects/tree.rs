//! Tree object
//!
//! A tree is one directory snapshot: a sorted mapping from entry name to a
//! blob id (file) or a nested tree id (subdirectory). Serialization is
//! canonical (entries are emitted in sorted name order), so two trees built
//! from the same entries in any construction order hash to the same id.
//!
//! ## Format
//!
//! On disk: `tree <size>\0` followed by one line per entry:
//! `<kind> <oid> <name>`
//!
//! Trees are built bottom-up from the flat staging entries and traversed
//! post-order when storing, so child ids exist before their parents are
//! hashed.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Component, Path, PathBuf};

/// One entry of a tree loaded from the object store.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub kind: ObjectType,
    pub oid: ObjectId,
}

/// In-memory node of a tree under construction.
#[derive(Debug, Clone)]
enum TreeNode {
    File(ObjectId),
    Directory(Tree),
}

/// Directory snapshot, either under construction (nested nodes) or loaded
/// from the object store (one flat level of entries).
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Nested entries while building from the staging area
    built_entries: BTreeMap<String, TreeNode>,
    /// Flat entries when loaded from the object store
    read_entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build the full nested tree structure from flat `path -> blob id`
    /// staging entries.
    pub fn build<'e>(
        entries: impl Iterator<Item = (&'e PathBuf, &'e ObjectId)>,
    ) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for (path, oid) in entries {
            let components = path
                .components()
                .map(|component| match component {
                    Component::Normal(name) => name
                        .to_str()
                        .map(str::to_string)
                        .context("non-utf8 path component"),
                    other => Err(anyhow::anyhow!("unexpected path component: {other:?}")),
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            root.add_entry(&components, oid)
                .with_context(|| format!("failed to stage '{}' into a tree", path.display()))?;
        }

        Ok(root)
    }

    fn add_entry(&mut self, components: &[String], oid: &ObjectId) -> anyhow::Result<()> {
        let (name, rest) = components
            .split_first()
            .context("empty path in staging entries")?;

        if rest.is_empty() {
            self.built_entries
                .insert(name.clone(), TreeNode::File(oid.clone()));
            return Ok(());
        }

        let node = self
            .built_entries
            .entry(name.clone())
            .or_insert_with(|| TreeNode::Directory(Tree::default()));

        match node {
            TreeNode::Directory(subtree) => subtree.add_entry(rest, oid),
            TreeNode::File(_) => anyhow::bail!("'{name}' is staged as both a file and a directory"),
        }
    }

    /// Visit every subtree post-order (children before parents). Storing in
    /// this order guarantees child ids are computed before they are embedded
    /// in the parent's serialization.
    pub fn traverse<F>(&self, func: &F) -> anyhow::Result<()>
    where
        F: Fn(&Tree) -> anyhow::Result<()>,
    {
        for node in self.built_entries.values() {
            if let TreeNode::Directory(subtree) = node {
                subtree.traverse(func)?;
            }
        }
        func(self)
    }

    /// Entries of a tree loaded from the object store.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeEntry)> {
        self.read_entries.iter()
    }

    /// Uniform view over both representations: `(name, kind, oid)` rows in
    /// sorted name order.
    fn rows(&self) -> anyhow::Result<Vec<(String, ObjectType, ObjectId)>> {
        if self.built_entries.is_empty() {
            return Ok(self
                .read_entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.kind, entry.oid.clone()))
                .collect());
        }

        self.built_entries
            .iter()
            .map(|(name, node)| match node {
                TreeNode::File(oid) => Ok((name.clone(), ObjectType::Blob, oid.clone())),
                TreeNode::Directory(subtree) => {
                    Ok((name.clone(), ObjectType::Tree, subtree.object_id()?))
                }
            })
            .collect()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        for (name, kind, oid) in self.rows()? {
            writeln!(content_bytes, "{} {} {}", kind.as_str(), oid.as_ref(), name)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            // names may contain spaces, so split off kind and oid only
            let mut parts = line.splitn(3, ' ');
            let kind = parts.next().context("missing tree entry kind")?;
            let oid = parts.next().context("missing tree entry oid")?;
            let name = parts.next().context("missing tree entry name")?;

            entries.insert(
                name.to_string(),
                TreeEntry::new(
                    ObjectType::try_from(kind)?,
                    ObjectId::try_parse(oid.to_string())?,
                ),
            );
        }

        Ok(Tree {
            built_entries: BTreeMap::new(),
            read_entries: entries,
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
