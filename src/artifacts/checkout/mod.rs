//! Checkout planning and execution
//!
//! Switching commits is planned before anything touches the disk: the
//! migration diffs the current and target snapshots against the live working
//! tree, surfaces every path whose local content would be lost, and only
//! then applies the file operations.

pub mod migration;
