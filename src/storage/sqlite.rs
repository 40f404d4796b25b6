//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::ref_type::RefType;
use crate::reference::Reference;
use super::schema;
use super::uri::DatabaseUri;

const REFERENCE_COLUMNS: &str = "id, author, title, booktitle, year, pages, type_id";

/// SQLite-backed storage for references and their types.
///
/// The handle is passed explicitly to every operation that touches the
/// database; there is no process-wide session.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open whatever a database URI points at
    pub fn open_uri(uri: &DatabaseUri) -> Result<Self> {
        tracing::debug!("Opening store at {}", uri);
        match uri {
            DatabaseUri::File(path) => Self::open(path),
            DatabaseUri::Memory => Self::open_in_memory(),
        }
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Type Operations ==========

    /// Insert a type row with its explicit id
    pub fn insert_type(&self, ref_type: &RefType) -> Result<()> {
        self.conn.execute(
            r#"INSERT INTO "type" (id, name) VALUES (?1, ?2)"#,
            params![ref_type.id, ref_type.name],
        )?;
        tracing::debug!("Inserted type {}", ref_type);
        Ok(())
    }

    /// Get a type by id
    pub fn get_type(&self, id: i64) -> Result<Option<RefType>> {
        self.conn
            .query_row(
                r#"SELECT id, name FROM "type" WHERE id = ?1"#,
                [id],
                Self::row_to_type,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find a type by its unique name
    pub fn find_type_by_name(&self, name: &str) -> Result<Option<RefType>> {
        self.conn
            .query_row(
                r#"SELECT id, name FROM "type" WHERE name = ?1"#,
                [name],
                Self::row_to_type,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Resolve a type given either its name or its numeric id
    pub fn resolve_type(&self, name_or_id: &str) -> Result<RefType> {
        let found = match name_or_id.parse::<i64>() {
            Ok(id) => self.get_type(id)?,
            Err(_) => self.find_type_by_name(name_or_id)?,
        };
        found.ok_or_else(|| Error::InvalidType(name_or_id.to_string()))
    }

    /// All types ordered by id
    pub fn list_types(&self) -> Result<Vec<RefType>> {
        let mut stmt = self.conn.prepare(r#"SELECT id, name FROM "type" ORDER BY id"#)?;

        let types = stmt
            .query_map([], Self::row_to_type)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(types)
    }

    /// Count all types
    pub fn count_types(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(r#"SELECT COUNT(*) FROM "type""#, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_type(row: &rusqlite::Row) -> rusqlite::Result<RefType> {
        let name: Option<String> = row.get(1)?;
        Ok(RefType {
            id: row.get(0)?,
            name: name.unwrap_or_default(),
        })
    }

    // ========== Reference Operations ==========

    /// Insert a reference, returning its id.
    ///
    /// An explicit `id` is kept as given; otherwise SQLite assigns one.
    pub fn insert_reference(&self, reference: &Reference) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO reference (id, author, title, booktitle, year, pages, type_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                reference.id,
                reference.author,
                reference.title,
                reference.booktitle,
                reference.year,
                reference.pages,
                reference.type_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!("Inserted reference {}", id);
        Ok(id)
    }

    /// Overwrite every column of reference `id` with the fields of `reference`
    pub fn update_reference(&self, id: i64, reference: &Reference) -> Result<()> {
        let changed = self.conn.execute(
            r#"
            UPDATE reference
            SET author = ?2, title = ?3, booktitle = ?4, year = ?5, pages = ?6, type_id = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                reference.author,
                reference.title,
                reference.booktitle,
                reference.year,
                reference.pages,
                reference.type_id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::ReferenceNotFound(id));
        }
        tracing::debug!("Updated reference {}", id);
        Ok(())
    }

    /// Delete a reference by id
    pub fn delete_reference(&self, id: i64) -> Result<()> {
        let changed = self.conn.execute("DELETE FROM reference WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(Error::ReferenceNotFound(id));
        }
        tracing::debug!("Deleted reference {}", id);
        Ok(())
    }

    /// Get a reference by id
    pub fn get_reference(&self, id: i64) -> Result<Option<Reference>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM reference WHERE id = ?1", REFERENCE_COLUMNS),
                [id],
                Self::row_to_reference,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All references ordered by id
    pub fn list_references(&self) -> Result<Vec<Reference>> {
        let mut stmt = self.conn.prepare(
            &format!("SELECT {} FROM reference ORDER BY id", REFERENCE_COLUMNS)
        )?;

        let references = stmt
            .query_map([], Self::row_to_reference)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(references)
    }

    /// References of one type, ordered by id
    pub fn find_references_by_type(&self, type_id: i64) -> Result<Vec<Reference>> {
        let mut stmt = self.conn.prepare(
            &format!("SELECT {} FROM reference WHERE type_id = ?1 ORDER BY id", REFERENCE_COLUMNS)
        )?;

        let references = stmt
            .query_map([type_id], Self::row_to_reference)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(references)
    }

    /// Count all references
    pub fn count_references(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM reference", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Look up the type row a reference points at
    pub fn reference_type(&self, reference: &Reference) -> Result<Option<RefType>> {
        match reference.type_id {
            Some(type_id) => self.get_type(type_id),
            None => Ok(None),
        }
    }

    /// Resolved type name for each reference, `None` where `type_id` dangles
    pub fn reference_type_names(&self, references: &[Reference]) -> Result<Vec<Option<String>>> {
        references
            .iter()
            .map(|r| -> Result<Option<String>> { Ok(self.reference_type(r)?.map(|t| t.name)) })
            .collect()
    }

    fn row_to_reference(row: &rusqlite::Row) -> rusqlite::Result<Reference> {
        Ok(Reference {
            id: row.get(0)?,
            author: row.get(1)?,
            title: row.get(2)?,
            booktitle: row.get(3)?,
            year: row.get(4)?,
            pages: row.get(5)?,
            type_id: row.get(6)?,
        })
    }

    // ========== Utility Operations ==========

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            types: self.count_types()?,
            references: self.count_references()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub types: usize,
    pub references: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Types: {}", self.types)?;
        writeln!(f, "  References: {}", self.references)
    }
}
