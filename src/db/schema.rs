//! SQL DDL for initializing the checklist storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `servers`: immutable reference data, `name` UNIQUE
/// - `checklist_entries`: `date` as RFC3339 text plus a derived `entry_day`
///   (`YYYY-MM-DD`, UTC) carrying the per-day uniqueness constraint
/// - tri-state status flags stored as nullable INTEGER 0/1
/// - `users`: credential records, `email` UNIQUE, never written by the API
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS servers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS checklist_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL, -- RFC3339
    entry_day TEXT NOT NULL, -- YYYY-MM-DD, derived from `date` in UTC
    server_id INTEGER NOT NULL REFERENCES servers(id),
    table_name TEXT NOT NULL,
    insert_status INTEGER NULL,
    update_status INTEGER NULL,
    delete_status INTEGER NULL,
    message_error TEXT NULL,
    sys_type TEXT NULL,
    UNIQUE(entry_day, server_id, table_name)
);

CREATE INDEX IF NOT EXISTS idx_checklist_entries_entry_day ON checklist_entries(entry_day);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user'
);
"#;
