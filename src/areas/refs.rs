//! Branch references and the HEAD pointer
//!
//! Branches are files under `refs/heads/<name>` holding the commit id of the
//! branch tip. `HEAD` holds either a symbolic reference to the active branch
//! (`ref: refs/heads/<name>`) or a raw commit id (the detached-HEAD state).
//! Exactly one of the two is active at any time, persisted between
//! invocations.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::collections::HashMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Pattern matching a symbolic HEAD entry
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Branch name characters and shapes that are rejected
const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Branch the HEAD symref points at in a fresh repository
pub const DEFAULT_BRANCH: &str = "master";

/// Validated branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("branch name cannot be empty");
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .context("invalid branch name pattern")?;

        if re.is_match(&name) {
            anyhow::bail!("invalid branch name: {}", name);
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What HEAD currently points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD follows a branch; commits advance the branch tip
    Attached(BranchName),
    /// HEAD pins a raw commit id
    Detached(ObjectId),
}

impl HeadState {
    pub fn is_detached(&self) -> bool {
        matches!(self, HeadState::Detached(_))
    }
}

/// Reference store rooted at the repository metadata directory (`.wit`).
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    /// Parse the HEAD record. Fails when the metadata directory is missing,
    /// which is how "not a repository" surfaces.
    pub fn head_state(&self) -> anyhow::Result<HeadState> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("unable to read HEAD at {}", head_path.display()))?;
        let content = content.trim();

        let symref = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref {
            Some(captures) => Ok(HeadState::Attached(BranchName::try_parse(
                captures[1].to_string(),
            )?)),
            None => Ok(HeadState::Detached(ObjectId::try_parse(
                content.to_string(),
            )?)),
        }
    }

    /// Commit id HEAD resolves to; None on an unborn branch (fresh repo).
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match self.head_state()? {
            HeadState::Attached(branch) => self.read_ref(&branch),
            HeadState::Detached(oid) => Ok(Some(oid)),
        }
    }

    /// Advance whatever HEAD is attached to: the branch tip when attached,
    /// the raw HEAD record when detached.
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.head_state()? {
            HeadState::Attached(branch) => self.update_ref_file(
                &self.heads_path().join(branch.as_ref()),
                oid.as_ref().to_string(),
            ),
            HeadState::Detached(_) => {
                self.update_ref_file(&self.head_path(), oid.as_ref().to_string())
            }
        }
    }

    /// Attach HEAD to a branch.
    pub fn attach_head(&self, branch: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            &self.head_path(),
            format!("ref: refs/heads/{branch}"),
        )
    }

    /// Detach HEAD onto a raw commit id.
    pub fn detach_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), oid.as_ref().to_string())
    }

    /// Tip of a branch; None if the branch file does not exist or is empty
    /// (an unborn default branch).
    pub fn read_ref(&self, branch: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(branch.as_ref());

        if !branch_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("unable to read branch file for '{branch}'"))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    pub fn branch_exists(&self, branch: &BranchName) -> bool {
        self.heads_path().join(branch.as_ref()).exists()
    }

    pub fn create_branch(&self, branch: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(branch.as_ref());

        if branch_path.exists() {
            anyhow::bail!("branch '{branch}' already exists");
        }

        self.update_ref_file(&branch_path, source_oid.as_ref().to_string())
    }

    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        Ok(WalkDir::new(&heads_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&heads_path).ok()?;
                BranchName::try_parse(relative.to_string_lossy().to_string()).ok()
            })
            .collect())
    }

    /// Invert the branch table: which branch names point at each commit.
    /// The graph layer uses this to label tip commits.
    pub fn reverse_refs(&self) -> anyhow::Result<HashMap<ObjectId, Vec<BranchName>>> {
        Ok(self
            .list_branches()?
            .into_iter()
            .fold(HashMap::new(), |mut acc, branch| {
                if let Ok(Some(oid)) = self.read_ref(&branch) {
                    acc.entry(oid).or_insert_with(Vec::new).push(branch);
                }
                acc
            }))
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("no parent directory for ref file at {}", path.display())
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("unable to open ref file at {}", path.display()))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn head_path(&self) -> std::path::PathBuf {
        self.path.join("HEAD")
    }

    pub fn refs_path(&self) -> std::path::PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> std::path::PathBuf {
        self.refs_path().join("heads")
    }
}
