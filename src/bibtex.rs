//! BibTeX serialization
//!
//! Entry layout (single line, no whitespace between fields):
//!
//! `@<Type>{<tag>,author={..},title={..},booktitle={..},year={..},pages={..}}`
//!
//! Unset fields render as empty braces.

use crate::reference::{int_or_empty, str_or_empty, Reference};
use crate::storage::SqliteStore;
use crate::{Error, Result};

/// Format an entry for an already-resolved type name.
pub fn format_entry(type_name: &str, reference: &Reference) -> String {
    format!(
        "@{}{{{},author={{{}}},title={{{}}},booktitle={{{}}},year={{{}}},pages={{{}}}}}",
        type_name,
        reference.tag(),
        str_or_empty(&reference.author),
        str_or_empty(&reference.title),
        str_or_empty(&reference.booktitle),
        int_or_empty(reference.year),
        int_or_empty(reference.pages),
    )
}

/// Render a reference as BibTeX.
///
/// Issues a fresh type lookup on every call. Fails with
/// [`Error::UnresolvedType`] when `type_id` is unset or names no row.
pub fn to_bibtex(store: &SqliteStore, reference: &Reference) -> Result<String> {
    let ref_type = match reference.type_id {
        Some(type_id) => store.get_type(type_id)?,
        None => None,
    };
    let ref_type = ref_type.ok_or(Error::UnresolvedType(reference.type_id))?;
    Ok(format_entry(&ref_type.name, reference))
}

/// Render every stored reference, in id order, one entry per line.
pub fn export_all(store: &SqliteStore) -> Result<String> {
    let entries = store
        .list_references()?
        .iter()
        .map(|reference| to_bibtex(store, reference))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Exported {} references", entries.len());
    Ok(entries.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RefType;

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_type(&RefType::new(1, "InCollection")).unwrap();
        store.insert_type(&RefType::new(2, "Book")).unwrap();
        store
    }

    fn lovelace() -> Reference {
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
    fn test_book_entry() {
        let store = seeded_store();
        let entry = to_bibtex(&store, &lovelace()).unwrap();
        assert_eq!(
            entry,
            "@Book{1Lovelace1843,author={Ada Lovelace},title={X},booktitle={Y},year={1843},pages={10}}"
        );
    }

    #[test]
    fn test_unset_fields_render_empty() {
        let store = seeded_store();
        let reference = Reference::new().with_id(7).with_type_id(1);
        let entry = reference.to_bibtex(&store).unwrap();
        assert_eq!(
            entry,
            "@InCollection{7,author={},title={},booktitle={},year={},pages={}}"
        );
    }

    #[test]
    fn test_unknown_type_id_is_an_error() {
        let store = seeded_store();
        let reference = lovelace().with_type_id(99);
        let err = to_bibtex(&store, &reference).unwrap_err();
        assert!(matches!(err, Error::UnresolvedType(Some(99))));
    }

    #[test]
    fn test_unset_type_id_is_an_error() {
        let store = seeded_store();
        let reference = Reference { type_id: None, ..lovelace() };
        let err = to_bibtex(&store, &reference).unwrap_err();
        assert!(matches!(err, Error::UnresolvedType(None)));
    }

    #[test]
    fn test_lookup_is_fresh() {
        let store = SqliteStore::open_in_memory().unwrap();
        let reference = lovelace();
        assert!(to_bibtex(&store, &reference).is_err());

        store.insert_type(&RefType::new(2, "Book")).unwrap();
        assert!(to_bibtex(&store, &reference).unwrap().starts_with("@Book{"));
    }

    #[test]
    fn test_export_all() {
        let store = seeded_store();
        store.insert_reference(&lovelace()).unwrap();
        store
            .insert_reference(&Reference::new().with_author("Alan Turing").with_year(1950).with_type_id(1))
            .unwrap();

        let exported = export_all(&store).unwrap();
        let lines: Vec<&str> = exported.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("@Book{1Lovelace1843,"));
        assert!(lines[1].starts_with("@InCollection{2Turing1950,"));
    }

    #[test]
    fn test_export_all_fails_on_dangling_type() {
        let store = seeded_store();
        store.insert_reference(&lovelace().with_type_id(42)).unwrap();
        assert!(matches!(export_all(&store), Err(Error::UnresolvedType(Some(42)))));
    }
}
