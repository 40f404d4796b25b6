//! Reference records - bibliographic citations
//!
//! A `Reference` is a plain data record mirroring one row of the `reference`
//! table. It carries the foreign key `type_id` but never a cached type row;
//! resolving the type is an explicit store call (see
//! [`SqliteStore::reference_type`](crate::SqliteStore::reference_type)).

use crate::bibtex;
use crate::storage::SqliteStore;
use crate::Result;
use serde::{Deserialize, Serialize};

/// A bibliographic citation record.
///
/// Equality is by value over every column, `type_id` included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Primary key, `None` until the record is stored
    pub id: Option<i64>,
    /// Free text, expected in "First Last" form
    pub author: Option<String>,
    pub title: Option<String>,
    pub booktitle: Option<String>,
    pub year: Option<i64>,
    pub pages: Option<i64>,
    /// Foreign key to `type.id`
    pub type_id: Option<i64>,
}

impl Reference {
    /// Create an empty, unsaved reference
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_booktitle(mut self, booktitle: impl Into<String>) -> Self {
        self.booktitle = Some(booktitle.into());
        self
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_pages(mut self, pages: i64) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_type_id(mut self, type_id: i64) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// Last whitespace-delimited token of the author, if any.
    pub fn author_surname(&self) -> Option<&str> {
        self.author.as_deref().and_then(|a| a.split_whitespace().last())
    }

    /// Citation tag: id + author surname + year.
    ///
    /// Unset components (and zero or empty values) contribute nothing, so
    /// this never fails.
    pub fn tag(&self) -> String {
        format!(
            "{}{}{}",
            int_or_empty(self.id),
            self.author_surname().unwrap_or(""),
            int_or_empty(self.year)
        )
    }

    /// Render as a BibTeX entry, looking the type up in `store`.
    pub fn to_bibtex(&self, store: &SqliteStore) -> Result<String> {
        bibtex::to_bibtex(store, self)
    }
}

/// Integer column rendered for tags and BibTeX fields; zero counts as unset.
pub(crate) fn int_or_empty(value: Option<i64>) -> String {
    match value {
        Some(v) if v != 0 => v.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn str_or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reference {
        Reference::new()
            .with_id(1)
            .with_author("Ada Lovelace")
            .with_title("X")
            .with_booktitle("Y")
            .with_year(1843)
            .with_pages(10)
            .with_type_id(2)
    }

    #[test]
    fn test_tag_full() {
        let reference = Reference::new().with_id(5).with_author("Jane Doe").with_year(2020);
        assert_eq!(reference.tag(), "5Doe2020");
    }

    #[test]
    fn test_tag_only_id() {
        assert_eq!(Reference::new().with_id(7).tag(), "7");
    }

    #[test]
    fn test_tag_without_author() {
        let reference = Reference::new().with_id(3).with_year(1999);
        assert_eq!(reference.author_surname(), None);
        assert_eq!(reference.tag(), "31999");
    }

    #[test]
    fn test_tag_empty_record() {
        assert_eq!(Reference::new().tag(), "");
    }

    #[test]
    fn test_tag_whitespace_author() {
        let reference = Reference::new().with_id(4).with_author("   ").with_year(2001);
        assert_eq!(reference.tag(), "42001");
    }

    #[test]
    fn test_tag_single_name_and_extra_spaces() {
        assert_eq!(Reference::new().with_author("Plato").tag(), "Plato");
        let reference = Reference::new().with_author("  Donald  E.  Knuth \n");
        assert_eq!(reference.tag(), "Knuth");
    }

    #[test]
    fn test_tag_zero_values_are_empty() {
        let reference = Reference::new().with_id(0).with_author("Jane Doe").with_year(0);
        assert_eq!(reference.tag(), "Doe");
    }

    #[test]
    fn test_equality() {
        assert_eq!(sample(), sample());
    }

    #[test]
    fn test_inequality_per_field() {
        let base = sample();
        let variants = [
            Reference { id: Some(2), ..base.clone() },
            Reference { author: Some("Charles Babbage".into()), ..base.clone() },
            Reference { title: None, ..base.clone() },
            Reference { booktitle: Some("Z".into()), ..base.clone() },
            Reference { year: Some(1842), ..base.clone() },
            Reference { pages: Some(11), ..base.clone() },
            Reference { type_id: Some(1), ..base.clone() },
        ];
        for variant in variants {
            assert_ne!(base, variant);
        }
    }
}
