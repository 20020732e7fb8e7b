//! SQL DDL for the journal store.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, ascending in creation order
/// - `title` 1..=127 characters, `text` non-empty
/// - `created` RFC3339 UTC with fixed precision, so text order is time order
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 127),
    text TEXT NOT NULL CHECK (length(text) > 0),
    created TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entries_created ON entries(created);
"#;
