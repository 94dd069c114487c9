/// SQL schema for the document store. Every collection shares one table;
/// entity fields live in the `data` JSON column.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(collection, created_at);
CREATE INDEX IF NOT EXISTS idx_documents_updated_at ON documents(collection, updated_at);

PRAGMA user_version = 1;
"#;

/// Get current schema version from database
pub fn get_schema_version(conn: &rusqlite::Connection) -> Result<i32, rusqlite::Error> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Run migrations to bring database to current schema version
pub fn migrate(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    let mut version = get_schema_version(conn)?;

    if version == 0 {
        // Fresh database - apply v1 schema
        conn.execute_batch(SCHEMA_V1)?;
        version = 1;
    }

    if version == 1 {
        Ok(())
    } else {
        Err(rusqlite::Error::InvalidQuery)
    }
}
