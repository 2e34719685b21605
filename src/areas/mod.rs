//! Core repository components
//!
//! - `database`: content-addressed object store for blobs, trees, and commits
//! - `index`: staging area mapping paths to the blob ids queued for commit
//! - `refs`: branch references and the HEAD pointer
//! - `repository`: high-level handle coordinating all components
//! - `workspace`: working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
