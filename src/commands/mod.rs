//! User-facing commands
//!
//! Each command is an extension `impl` block on [`Repository`], so commands
//! compose the areas (workspace, index, database, refs) without the CLI layer
//! knowing about any of them.
//!
//! ## Commands
//!
//! - `init`: Create a new repository
//! - `add`: Stage files for commit
//! - `remove`: Unstage files
//! - `commit`: Record the staged snapshot
//! - `branch`: Create or list branches
//! - `checkout`: Switch to a branch or commit
//! - `merge`: Combine another line of history into the current branch
//! - `status`: Show working tree status
//! - `graph`: Render the commit graph as Graphviz DOT
//!
//! [`Repository`]: crate::areas::repository::Repository

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod graph;
pub mod init;
pub mod merge;
pub mod remove;
pub mod status;
