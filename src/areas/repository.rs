//! Repository handle
//!
//! Explicit handle over the persisted repository state, passed to every
//! operation instead of ambient globals. Metadata lives under the hidden
//! `.wit` subtree of the working directory.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::{BranchName, Refs};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::WitError;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Shortest abbreviated commit id accepted as a checkout/merge target
const MIN_PREFIX_LENGTH: usize = 4;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let index = Index::new(path.join(".wit").join("index").into_boxed_path());
        let database = Database::new(path.join(".wit").join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(path.join(".wit").into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Resolve a checkout/merge target: a branch name first, then a full
    /// commit id, then an unambiguous abbreviated id. Anything else is
    /// `UnknownRef`.
    pub fn resolve_ref(&self, target: &str) -> anyhow::Result<ObjectId> {
        if let Ok(branch) = BranchName::try_parse(target.to_string())
            && self.refs.branch_exists(&branch)
            && let Some(oid) = self.refs.read_ref(&branch)?
        {
            return Ok(oid);
        }

        if target.len() == OBJECT_ID_LENGTH
            && let Ok(oid) = ObjectId::try_parse(target.to_string())
            && self.database.load(&oid).is_ok()
        {
            return Ok(oid);
        }

        if (MIN_PREFIX_LENGTH..OBJECT_ID_LENGTH).contains(&target.len())
            && target.chars().all(|c| c.is_ascii_hexdigit())
        {
            let mut matches = self.database.find_objects_by_prefix(target)?;
            if matches.len() == 1 {
                return Ok(matches.remove(0));
            }
            if matches.len() > 1 {
                anyhow::bail!("ambiguous ref '{target}': matches {} objects", matches.len());
            }
        }

        Err(WitError::UnknownRef(target.to_string()).into())
    }
}
