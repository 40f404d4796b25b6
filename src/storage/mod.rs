//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - type(id, name)
//! - reference(id, author, title, booktitle, year, pages, type_id)

pub mod schema;
pub mod sqlite;
pub mod uri;

pub use sqlite::{SqliteStore, DbStats};
pub use uri::{DatabaseUri, DEFAULT_DATABASE_URI};
