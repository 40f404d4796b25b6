//! Reference types - the lookup table of citation categories
//!
//! Each row names a BibTeX entry type (`InCollection`, `Book`, ...).
//! Rows are created by the startup seed list and never modified afterwards.

use serde::{Deserialize, Serialize};

/// A row of the `type` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefType {
    /// Primary key
    pub id: i64,
    /// Entry type name, unique across all rows
    pub name: String,
}

impl RefType {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

impl std::fmt::Display for RefType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ty = RefType::new(2, "Book");
        assert_eq!(ty.to_string(), "Book (2)");
    }
}
