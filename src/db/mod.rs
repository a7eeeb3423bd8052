//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and date helpers
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the checklist storage over a sqlx pool

pub mod models;
pub mod schema;
pub mod sqlite;

use crate::error::DbCheckError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use models::{DbEntry, DbServer, DbUser, EntryWithServer, NewEntry, Role};
pub use schema::SQLITE_INIT;
pub use sqlite::{ChecklistStorage, SqlitePool};

/// Open the SQLite pool for `database_url` (creating the file when missing)
/// and initialize the schema.
pub async fn spawn(database_url: &str) -> Result<ChecklistStorage, DbCheckError> {
    let connect_opts = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_opts)
        .await?;
    let storage = ChecklistStorage::new(pool);
    storage.init_schema().await?;
    Ok(storage)
}
