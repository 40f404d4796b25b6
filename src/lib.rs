//! # bibref - Bibliographic reference store
//!
//! A two-table relational schema for citation records.
//!
//! bibref provides:
//! - `Type` rows (reference categories such as `Book`) seeded at startup
//! - `Reference` rows pointing at exactly one type
//! - Citation tag derivation (`<id><surname><year>`)
//! - BibTeX serialization with an explicit type lookup against the store
//! - SQLite-backed storage behind an explicit handle

pub mod ref_type;
pub mod reference;
pub mod bibtex;
pub mod storage;
pub mod seed;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use ref_type::RefType;
pub use reference::Reference;
pub use storage::{DatabaseUri, SqliteStore};
pub use seed::{SeedReport, SEED_TYPES};

/// Result type alias for bibref operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bibref operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid database URI: {0}")]
    InvalidDatabaseUri(String),

    #[error("Reference type not found for type_id {}", display_type_id(.0))]
    UnresolvedType(Option<i64>),

    #[error("Reference not found: {0}")]
    ReferenceNotFound(i64),

    #[error("Unknown reference type: {0}")]
    InvalidType(String),
}

fn display_type_id(type_id: &Option<i64>) -> String {
    match type_id {
        Some(id) => id.to_string(),
        None => "<unset>".to_string(),
    }
}
