//! Content-addressed object store
//!
//! Objects are zlib-compressed files under `objects/<aa>/<bbbb...>` where
//! `aabbbb...` is the SHA-1 of the serialized object. Writes are idempotent:
//! content that already exists on disk is never rewritten, and new objects
//! land via a temp file plus atomic rename so a crash cannot leave a partial
//! object behind. Nothing is ever mutated or deleted.

use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::tree::Tree;
use crate::errors::WitError;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object unless an object with the same id already exists.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<()> {
        let object_path = self.path.join(object.object_path()?);

        // identical content hashes to an identical path, so an existing file
        // already holds exactly these bytes
        if object_path.exists() {
            return Ok(());
        }

        self.write_object(object_path, object.serialize()?)
    }

    /// Raw decompressed bytes of an object, header included.
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            return Err(WitError::NotFound(object_id.clone()).into());
        }

        let compressed = std::fs::read(&object_path).with_context(|| {
            format!("unable to read object file {}", object_path.display())
        })?;

        Self::decompress(compressed.into())
    }

    pub fn parse_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (object_type, reader) = self.parse_object_as_bytes(object_id)?;
        match object_type {
            ObjectType::Blob => Blob::deserialize(reader),
            other => anyhow::bail!("object {object_id} is a {other}, expected a blob"),
        }
    }

    pub fn parse_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        let (object_type, reader) = self.parse_object_as_bytes(object_id)?;
        match object_type {
            ObjectType::Tree => Tree::deserialize(reader),
            other => anyhow::bail!("object {object_id} is a {other}, expected a tree"),
        }
    }

    pub fn parse_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let (object_type, reader) = self.parse_object_as_bytes(object_id)?;
        match object_type {
            ObjectType::Commit => Commit::deserialize(reader),
            other => anyhow::bail!("object {object_id} is a {other}, expected a commit"),
        }
    }

    /// Parent/timestamp projection of a commit, for ancestry walks.
    pub fn slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        let commit = self.parse_commit(object_id)?;

        Ok(SlimCommit {
            oid: object_id.clone(),
            parents: commit.parents().to_vec(),
            timestamp: commit.timestamp(),
        })
    }

    /// Flatten a tree recursively into `path -> blob id` entries.
    pub fn flatten_tree(&self, tree_oid: &ObjectId) -> anyhow::Result<BTreeMap<PathBuf, ObjectId>> {
        let mut entries = BTreeMap::new();
        self.flatten_tree_into(tree_oid, Path::new(""), &mut entries)?;
        Ok(entries)
    }

    /// Flatten the tree of a commit.
    pub fn flatten_commit(
        &self,
        commit_oid: &ObjectId,
    ) -> anyhow::Result<BTreeMap<PathBuf, ObjectId>> {
        let commit = self.parse_commit(commit_oid)?;
        self.flatten_tree(commit.tree_oid())
    }

    fn flatten_tree_into(
        &self,
        tree_oid: &ObjectId,
        prefix: &Path,
        entries: &mut BTreeMap<PathBuf, ObjectId>,
    ) -> anyhow::Result<()> {
        let tree = self.parse_tree(tree_oid)?;

        for (name, entry) in tree.entries() {
            let path = prefix.join(name);
            match entry.kind {
                ObjectType::Blob => {
                    entries.insert(path, entry.oid.clone());
                }
                ObjectType::Tree => self.flatten_tree_into(&entry.oid, &path, entries)?,
                ObjectType::Commit => {
                    anyhow::bail!("tree {tree_oid} references commit {} as an entry", entry.oid)
                }
            }
        }

        Ok(())
    }

    /// All stored object ids starting with the given hex prefix. Used to
    /// resolve abbreviated ids; more than one match means the prefix is
    /// ambiguous.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();

        if prefix.len() < 2 {
            return Ok(matches);
        }

        let dir_name = &prefix[..2];
        let file_prefix = &prefix[2..];
        let dir_path = self.path.join(dir_name);

        if dir_path.is_dir() {
            for entry in std::fs::read_dir(&dir_path)? {
                let file_name = entry?.file_name();
                let file_name = file_name.to_string_lossy();

                if file_name.starts_with(file_prefix)
                    && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
                {
                    matches.push(oid);
                }
            }
        }

        Ok(matches)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let content = self.load(object_id)?;
        let mut reader = Cursor::new(content);

        let object_type = ObjectType::parse_header(&mut reader)?;

        Ok((object_type, reader))
    }

    fn write_object(&self, object_path: PathBuf, content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("unable to create object directory {}", object_dir.display())
        })?;

        let compressed = Self::compress(content)?;

        // write to a temp file in the same directory, then atomically rename
        let mut temp_file = tempfile::NamedTempFile::new_in(object_dir)
            .context("unable to create temporary object file")?;
        temp_file
            .write_all(&compressed)
            .context("unable to write object content")?;
        temp_file.persist(&object_path).with_context(|| {
            format!("unable to move object into place at {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("unable to compress object content")?;

        encoder
            .finish()
            .map(Bytes::from)
            .context("unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .context("unable to decompress object content")?;

        Ok(decompressed.into())
    }
}
