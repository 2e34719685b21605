//! Working directory file system operations
//!
//! All paths handed out and accepted here are relative to the repository
//! root. The hidden `.wit` metadata subtree is never listed or touched.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::WitError;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".wit", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List every file under the given path (or the whole workspace),
    /// relative to the repository root. A file path lists itself; a missing
    /// path is `PathNotFound`.
    pub fn list_files(&self, root_file_path: Option<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
        let root_file_path = match root_file_path {
            Some(p) => {
                let absolute = self.path.join(&p);
                if !absolute.exists() {
                    return Err(WitError::PathNotFound(p).into());
                }
                absolute
            }
            None => self.path.to_path_buf(),
        };

        if root_file_path.is_dir() {
            Ok(WalkDir::new(&root_file_path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| self.relative_if_tracked_file(entry.path()))
                .collect())
        } else {
            Ok(vec![
                root_file_path
                    .strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .unwrap_or_default(),
            ])
        }
    }

    /// Hash every workspace file in place without storing anything, giving
    /// the current working-tree state as `path -> blob id`.
    pub fn snapshot(&self) -> anyhow::Result<BTreeMap<PathBuf, ObjectId>> {
        self.list_files(None)?
            .into_iter()
            .map(|path| {
                let oid = self.hash_file(&path)?;
                Ok((path, oid))
            })
            .collect()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<String> {
        std::fs::read_to_string(self.path.join(file_path))
            .with_context(|| format!("unable to read file '{}'", file_path.display()))
    }

    /// Blob id the file would have if staged right now.
    pub fn hash_file(&self, file_path: &Path) -> anyhow::Result<ObjectId> {
        Blob::new(self.read_file(file_path)?).object_id()
    }

    pub fn write_file(&self, file_path: &Path, content: &str) -> anyhow::Result<()> {
        let absolute = self.path.join(file_path);

        // a directory left at this path would shadow the file
        if absolute.is_dir() {
            std::fs::remove_dir_all(&absolute).with_context(|| {
                format!("unable to replace directory '{}'", file_path.display())
            })?;
        }

        if let Some(parent) = absolute.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("unable to create directory '{}'", parent.display())
            })?;
        }

        std::fs::write(&absolute, content)
            .with_context(|| format!("unable to write file '{}'", file_path.display()))
    }

    /// Remove a file and prune any directories left empty above it.
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let absolute = self.path.join(file_path);

        if absolute.is_file() {
            std::fs::remove_file(&absolute)
                .with_context(|| format!("unable to remove file '{}'", file_path.display()))?;
        }

        self.prune_empty_parent_dirs(&absolute)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("unable to remove directory '{}'", parent.display()))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
            } else {
                false
            }
        })
    }

    fn relative_if_tracked_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() && !Self::is_ignored(path) {
            Some(path.strip_prefix(self.path.as_ref()).ok()?.to_path_buf())
        } else {
            None
        }
    }
}
