//! Data structures and algorithms
//!
//! - `objects`: stored object types (blob, tree, commit) and their ids
//! - `checkout`: migration planning between two directory snapshots
//! - `merge`: common ancestor search and three-way tree resolution
//! - `graph`: read-only enumeration of the commit history
//! - `status`: working tree vs index vs HEAD comparison

pub mod checkout;
pub mod graph;
pub mod merge;
pub mod objects;
pub mod status;
