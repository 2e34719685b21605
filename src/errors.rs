//! Domain error kinds
//!
//! Structural failures are represented as typed variants so callers can
//! match on them; they are carried through `anyhow::Error` and can be
//! recovered with `downcast_ref`. Merge conflicts are deliberately not an
//! error kind: a conflicted merge returns a `ConflictReport` value instead.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WitError {
    #[error("object {0} not found in the object database")]
    NotFound(ObjectId),

    #[error("path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("nothing to commit, staging area matches the current commit")]
    NothingToCommit,

    #[error("unknown ref: '{0}' is neither a branch nor a commit id")]
    UnknownRef(String),

    #[error(
        "checkout would overwrite local changes to:\n{}\ncommit your changes or retry with --force",
        format_paths(.paths)
    )]
    CheckoutWouldOverwrite { paths: Vec<PathBuf> },

    #[error("refusing to merge unrelated histories")]
    UnrelatedHistories,
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("\t{}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
