//! Database URI - where the store lives
//!
//! Format: `sqlite://[/<path>]`
//!
//! Examples:
//! - `sqlite:///app.db` - `app.db` relative to the working directory
//! - `sqlite:////var/lib/bibref/app.db` - absolute path
//! - `sqlite://` or `sqlite:///:memory:` - in-memory database

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Store location used when nothing else is configured
pub const DEFAULT_DATABASE_URI: &str = "sqlite:///app.db";

const SCHEME: &str = "sqlite://";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatabaseUri {
    /// File-backed database
    File(PathBuf),
    /// Private in-memory database, gone when the handle drops
    Memory,
}

impl DatabaseUri {
    /// Parse a `sqlite://` URI
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix(SCHEME).ok_or_else(|| {
            Error::InvalidDatabaseUri(format!("{} (only {} is supported)", uri, SCHEME))
        })?;

        if rest.is_empty() {
            return Ok(DatabaseUri::Memory);
        }

        // Anything between `//` and the next `/` would be a host
        let path = rest.strip_prefix('/').ok_or_else(|| {
            Error::InvalidDatabaseUri(format!("{} (sqlite URIs take no host)", uri))
        })?;

        match path {
            "" | ":memory:" => Ok(DatabaseUri::Memory),
            p => Ok(DatabaseUri::File(PathBuf::from(p))),
        }
    }

    /// Path of a file-backed database
    pub fn path(&self) -> Option<&Path> {
        match self {
            DatabaseUri::File(path) => Some(path),
            DatabaseUri::Memory => None,
        }
    }

    pub fn to_uri_string(&self) -> String {
        match self {
            DatabaseUri::File(path) => format!("{}/{}", SCHEME, path.display()),
            DatabaseUri::Memory => format!("{}/:memory:", SCHEME),
        }
    }
}

impl Default for DatabaseUri {
    fn default() -> Self {
        DatabaseUri::File(PathBuf::from("app.db"))
    }
}

impl fmt::Display for DatabaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri_string())
    }
}

impl FromStr for DatabaseUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DatabaseUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_uri_string())
    }
}

impl<'de> Deserialize<'de> for DatabaseUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DatabaseUri::parse(&s).map_err(serde::de::Error::custom)
    }
}
