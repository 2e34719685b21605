//! Commit object
//!
//! A commit records one immutable point in history: the tree id of the full
//! directory snapshot, zero, one, or two parent commit ids (zero only for
//! the root commit, two for merges), the author, and the message.
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-oid>
//! parent <parent-oid>
//! author <name> <email> <timestamp> <timezone>
//!
//! <message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Author identity and commit timestamp.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Author identity from `WIT_AUTHOR_NAME` / `WIT_AUTHOR_EMAIL`, with an
    /// optional `WIT_AUTHOR_DATE` override for reproducible commits.
    pub fn load_from_env() -> Self {
        let name = std::env::var("WIT_AUTHOR_NAME").unwrap_or_else(|_| "wit user".to_string());
        let email =
            std::env::var("WIT_AUTHOR_EMAIL").unwrap_or_else(|_| "wit@localhost".to_string());
        let timestamp = std::env::var("WIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Author::new_with_timestamp(name, email, ts),
            None => Author::new(name, email),
        }
    }

    /// Serialized form: "name <email> timestamp timezone".
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // "name <email> timestamp timezone"; split from the right so names
        // with spaces survive
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            anyhow::bail!("invalid author format: {value}");
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .context("invalid author timestamp")?;
        let name_email = parts[2];

        let email_start = name_email
            .find('<')
            .context("invalid author format: missing '<'")?;
        let email_end = name_email
            .find('>')
            .context("invalid author format: missing '>'")?;

        let name = name_email[..email_start].trim().to_string();
        let email = name_email[email_start + 1..email_end].to_string();

        let datetime =
            chrono::DateTime::from_timestamp(timestamp, 0).context("invalid author timestamp")?;
        let datetime = chrono::DateTime::parse_from_str(
            &format!("{} {}", datetime.format("%Y-%m-%d %H:%M:%S"), timezone),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .context("invalid author timezone")?;

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Parent/timestamp projection of a commit, enough for ancestry walks.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: chrono::DateTime<chrono::FixedOffset>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Empty for the root commit, two entries for a merge commit
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    message: String,
}

impl Commit {
    pub fn new(parents: Vec<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parents,
            tree_oid,
            author,
            message,
        }
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() == 2
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, for one-line display.
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.author.timestamp()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        object_content.push(format!("tree {}", self.tree_oid.as_ref()));
        for parent in &self.parents {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!("author {}", self.author.display()));
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let content_bytes = object_content.join("\n").into_bytes();

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.lines();

        let tree_line = lines.next().context("invalid commit: missing tree line")?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .context("invalid commit: malformed tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut parents = Vec::new();
        let mut next_line = lines.next().context("invalid commit: missing author line")?;

        while let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent_oid.to_string())?);
            next_line = lines.next().context("invalid commit: missing author line")?;
        }

        let author = next_line
            .strip_prefix("author ")
            .context("invalid commit: malformed author line")?;
        let author = Author::try_from(author)?;

        // skip the blank separator line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(parents, tree_oid, author, message))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
