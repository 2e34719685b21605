use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume the `<kind> <size>\0` header and return the kind.
    pub fn parse_header(reader: &mut impl BufRead) -> anyhow::Result<ObjectType> {
        let mut kind = Vec::new();
        reader.read_until(b' ', &mut kind)?;

        let kind = String::from_utf8(kind)?;
        let kind = kind.trim();

        // skip the size part, it is implied by the payload
        let mut size = Vec::new();
        reader.read_until(b'\0', &mut size)?;

        ObjectType::try_from(kind)
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            other => Err(anyhow::anyhow!("invalid object type: {other}")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
