//! wit: a minimal local version-control engine
//!
//! The library is organized into three layers:
//!
//! - `areas`: the repository components (object database, staging index,
//!   refs, workspace) and the `Repository` handle coordinating them
//! - `artifacts`: the data structures and algorithms (objects, checkout
//!   migration, merge resolution, history graph)
//! - `commands`: the user-facing operations, each implemented as an
//!   extension block on `Repository`

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
