//! Startup seeding of the `type` table
//!
//! Each seed entry carries a hardcoded id so identifiers match between
//! environments. An entry is skipped when a row with the same name exists.
//!
//! The check-then-insert runs inside a single transaction but takes no lock
//! before the existence check: two processes seeding the same file at once
//! can both see a name as missing, and the loser fails on `UNIQUE(name)`.
//! A differently-named row already holding a seed id fails the same way on
//! the primary key.

use crate::ref_type::RefType;
use crate::storage::{DatabaseUri, SqliteStore};
use crate::Result;
use serde::Serialize;

/// Reference types guaranteed to exist after startup, as `(id, name)`.
pub const SEED_TYPES: &[(i64, &str)] = &[
    (1, "InCollection"),
    (2, "Book"),
];

/// What a seeding run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub inserted: Vec<String>,
    pub skipped: Vec<String>,
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} type(s) inserted, {} already present",
            self.inserted.len(),
            self.skipped.len()
        )
    }
}

/// Insert every missing seed type, committing once at the end.
pub fn seed_types(store: &mut SqliteStore) -> Result<SeedReport> {
    store.begin_transaction()?;
    let outcome = insert_missing(store);
    finish_transaction(store, outcome)
}

/// Commit on success, roll back on failure. The insert error wins over any
/// rollback error.
fn finish_transaction(store: &mut SqliteStore, outcome: Result<SeedReport>) -> Result<SeedReport> {
    match outcome {
        Ok(report) => {
            store.commit()?;
            if report.inserted.is_empty() {
                tracing::debug!("Seeded types: {}", report);
            } else {
                tracing::info!("Seeded types: {}", report);
            }
            Ok(report)
        }
        Err(e) => {
            tracing::error!("Seeding types failed: {}", e);
            if let Err(rollback_err) = store.rollback() {
                tracing::error!("Rollback after failed seeding also failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

fn insert_missing(store: &SqliteStore) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for &(id, name) in SEED_TYPES {
        if store.find_type_by_name(name)?.is_some() {
            tracing::debug!("Type {} already present", name);
            report.skipped.push(name.to_string());
            continue;
        }
        store.insert_type(&RefType::new(id, name))?;
        report.inserted.push(name.to_string());
    }

    Ok(report)
}

/// Startup sequence: open the store (creating the schema) and seed it.
pub fn open_and_seed(uri: &DatabaseUri) -> Result<(SqliteStore, SeedReport)> {
    let mut store = SqliteStore::open_uri(uri)?;
    let report = seed_types(&mut store)?;
    Ok((store, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_seed_inserts_all() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let report = seed_types(&mut store).unwrap();

        assert_eq!(report.inserted, vec!["InCollection", "Book"]);
        assert!(report.skipped.is_empty());
        assert_eq!(store.get_type(1).unwrap().unwrap().name, "InCollection");
        assert_eq!(store.get_type(2).unwrap().unwrap().name, "Book");
    }

    #[test]
    fn test_seed_twice_is_idempotent() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        seed_types(&mut store).unwrap();
        let report = seed_types(&mut store).unwrap();

        assert!(report.inserted.is_empty());
        assert_eq!(report.skipped.len(), SEED_TYPES.len());
        assert_eq!(store.count_types().unwrap(), SEED_TYPES.len());
    }

    #[test]
    fn test_seed_keeps_existing_row_with_other_id() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert_type(&RefType::new(5, "Book")).unwrap();

        let report = seed_types(&mut store).unwrap();
        assert_eq!(report.inserted, vec!["InCollection"]);
        assert_eq!(report.skipped, vec!["Book"]);
        assert_eq!(store.find_type_by_name("Book").unwrap().unwrap().id, 5);
    }

    #[test]
    fn test_seed_id_collision_rolls_back() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert_type(&RefType::new(2, "Article")).unwrap();

        let err = seed_types(&mut store).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        // InCollection was inserted before the collision and must be rolled back
        assert!(store.find_type_by_name("InCollection").unwrap().is_none());
        assert_eq!(store.count_types().unwrap(), 1);
    }

    #[test]
    fn test_failed_rollback_keeps_original_error() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        // No transaction is open, so ROLLBACK itself fails
        let outcome = Err(Error::InvalidType("Thesis".to_string()));
        let err = finish_transaction(&mut store, outcome).unwrap_err();
        assert!(matches!(err, Error::InvalidType(ref name) if name == "Thesis"));
    }

    #[test]
    fn test_open_and_seed_file_twice() {
        let dir = tempfile::tempdir().unwrap();
        let uri = DatabaseUri::File(dir.path().join("app.db"));

        let (_, first) = open_and_seed(&uri).unwrap();
        assert_eq!(first.inserted.len(), 2);

        let (store, second) = open_and_seed(&uri).unwrap();
        assert!(second.inserted.is_empty());
        assert_eq!(store.list_types().unwrap().len(), 2);
    }
}
