//! Staging area (index)
//!
//! The index records which paths are queued for the next commit and the
//! blob id of the content each path should carry. It is a flat
//! `path -> blob id` mapping, persisted after every mutating operation so it
//! survives process restarts.
//!
//! ## File format
//!
//! One record per line, `<oid> <path>`, in sorted path order, followed by a
//! trailing `checksum <sha1>` line over the records for integrity
//! verification. Reads take a shared file lock, writes an exclusive one.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

const CHECKSUM_PREFIX: &str = "checksum ";

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.wit/index`)
    path: Box<Path>,
    /// Staged paths mapped to the blob id queued for the next commit
    entries: BTreeMap<PathBuf, ObjectId>,
    /// Set when in-memory entries have diverged from the file
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the staging entries from disk, verifying the checksum trailer.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            std::fs::File::create(&self.path).context("unable to create the index file")?;
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = String::new();
        std::io::Read::read_to_string(lock.deref_mut(), &mut content)?;

        if content.is_empty() {
            return Ok(());
        }

        let mut lines: Vec<&str> = content.lines().collect();
        let checksum = lines
            .pop()
            .and_then(|line| line.strip_prefix(CHECKSUM_PREFIX))
            .context("index file is missing its checksum trailer")?;

        let records = lines.iter().map(|line| format!("{line}\n")).collect::<String>();
        if Self::checksum_of(&records) != checksum {
            anyhow::bail!("index file is corrupted: checksum mismatch");
        }

        for line in lines {
            let (oid, path) = line.split_once(' ').context("malformed index record")?;
            self.entries
                .insert(PathBuf::from(path), ObjectId::try_parse(oid.to_string())?);
        }

        Ok(())
    }

    /// Persist the staging entries, replacing the file contents atomically
    /// under an exclusive lock.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut records = String::new();
        for (path, oid) in &self.entries {
            records.push_str(&format!("{} {}\n", oid.as_ref(), path.display()));
        }

        let checksum = Self::checksum_of(&records);
        lock.deref_mut()
            .write_all(format!("{records}{CHECKSUM_PREFIX}{checksum}\n").as_bytes())?;

        self.changed = false;
        Ok(())
    }

    pub fn add(&mut self, path: PathBuf, oid: ObjectId) {
        self.entries.insert(path, oid);
        self.changed = true;
    }

    /// Drop a staged path; for a directory, drop everything under it.
    pub fn remove(&mut self, path: &Path) {
        let before = self.entries.len();
        self.entries
            .retain(|entry_path, _| entry_path != path && !entry_path.starts_with(path));
        self.changed = self.changed || self.entries.len() != before;
    }

    /// Clear all staging entries.
    pub fn clear(&mut self) {
        self.changed = self.changed || !self.entries.is_empty();
        self.entries.clear();
    }

    /// Replace the entries with a commit's flattened tree so the staging
    /// area exactly mirrors it.
    pub fn load_from_tree(&mut self, entries: BTreeMap<PathBuf, ObjectId>) {
        self.entries = entries;
        self.changed = true;
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    /// True if the path is staged, either directly or as a directory with
    /// staged entries below it.
    pub fn tracks(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
            || self.entries.keys().any(|entry| entry.starts_with(path))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn checksum_of(records: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(records.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
