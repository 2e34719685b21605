//! Stored object types and operations
//!
//! Everything tracked by the engine is an immutable object identified by the
//! SHA-1 hash of its serialized form. There are three kinds:
//!
//! - **Blob**: file content
//! - **Tree**: directory snapshot (sorted names mapped to blob/tree ids)
//! - **Commit**: snapshot record (tree id, parent ids, author, message)
//!
//! All objects serialize as `<kind> <size>\0<content>`. Identical logical
//! content always serializes identically, so equal content collides to the
//! same id. The object store relies on this for deduplication.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
