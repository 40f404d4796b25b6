//! Database schema definitions

/// SQL to create the type table
pub const CREATE_TYPE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "type" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR UNIQUE
)
"#;

/// SQL to create the reference table
/// `type_id` is declared as a foreign key but foreign key enforcement stays off
pub const CREATE_REFERENCE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reference (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    author VARCHAR,
    title VARCHAR,
    booktitle VARCHAR,
    year INTEGER,
    pages INTEGER,
    type_id INTEGER REFERENCES "type"(id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_reference_type ON reference(type_id)",
];

/// All schema creation statements, dependencies first
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_TYPE_TABLE, CREATE_REFERENCE_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
