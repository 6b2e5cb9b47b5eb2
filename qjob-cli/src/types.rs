//! Common types used across CLI modules

use uuid::Uuid;

/// Job identifier that can be either a full UUID or an unambiguous prefix
#[derive(Debug, Clone)]
pub enum IdOrPrefix {
    /// Full UUID
    Full(Uuid),
    /// Prefix that should uniquely identify a job
    Prefix(String),
}

impl IdOrPrefix {
    /// Parse a string into an IdOrPrefix
    ///
    /// Attempts to parse as a full UUID first, otherwise treats as a prefix
    pub fn parse(input: &str) -> Self {
        if let Ok(uuid) = Uuid::parse_str(input) {
            IdOrPrefix::Full(uuid)
        } else {
            IdOrPrefix::Prefix(input.to_string())
        }
    }

    /// Get the full id, if this is one
    pub fn as_full(&self) -> Option<String> {
        match self {
            IdOrPrefix::Full(uuid) => Some(uuid.to_string()),
            IdOrPrefix::Prefix(_) => None,
        }
    }

    /// Get the prefix string
    pub fn as_str(&self) -> String {
        match self {
            IdOrPrefix::Full(uuid) => uuid.to_string(),
            IdOrPrefix::Prefix(prefix) => prefix.clone(),
        }
    }
}

impl std::fmt::Display for IdOrPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str())
    }
}
