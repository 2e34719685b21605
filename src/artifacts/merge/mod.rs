//! Merge algorithms
//!
//! - `ancestor`: nearest common ancestor search over the commit DAG
//! - `three_way`: per-path reconciliation of two divergent snapshots against
//!   their common base, producing resolved entries and conflicts

pub mod ancestor;
pub mod three_way;
