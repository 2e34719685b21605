//! Object identifier (SHA-1 hash)
//!
//! A 40-character lowercase hexadecimal string naming an object by its
//! content. Objects live on disk under `objects/<first-2-chars>/<rest>`.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use std::path::PathBuf;

/// Content hash identifying a blob, tree, or commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            anyhow::bail!("invalid object id length: {}", id.len());
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            anyhow::bail!("invalid object id characters: {}", id);
        }
        Ok(Self(id))
    }

    /// Fan-out storage path: `abc123...` becomes `ab/c123...`.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters, for display.
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
