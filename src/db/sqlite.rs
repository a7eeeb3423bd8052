use crate::db::models::{
    DbEntry, DbServer, DbUser, EntryWithServer, NewEntry, Role, day_key,
};
use crate::db::schema::SQLITE_INIT;
use crate::error::DbCheckError;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct ChecklistStorage {
    pool: SqlitePool,
}

impl ChecklistStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), DbCheckError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert missing server names; existing rows are left untouched.
    /// Servers are reference data: seeded once, never mutated afterwards.
    pub async fn seed_servers(&self, names: &[String]) -> Result<(), DbCheckError> {
        let mut tx = self.pool.begin().await?;
        for name in names {
            sqlx::query("INSERT OR IGNORE INTO servers (name) VALUES (?)")
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_servers(&self) -> Result<Vec<DbServer>, DbCheckError> {
        let rows = sqlx::query("SELECT id, name FROM servers ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_server).collect()
    }

    /// All entries whose timestamp falls on `day` (UTC), joined with their
    /// server, ordered by server name then table name.
    pub async fn list_for_day(&self, day: NaiveDate) -> Result<Vec<EntryWithServer>, DbCheckError> {
        let rows = sqlx::query(
            r#"SELECT e.id, e.date, e.server_id, e.table_name, e.insert_status,
                      e.update_status, e.delete_status, e.message_error, e.sys_type,
                      s.id AS s_id, s.name AS s_name
               FROM checklist_entries e
               JOIN servers s ON s.id = e.server_id
               WHERE e.entry_day = ?
               ORDER BY s.name ASC, e.table_name ASC"#,
        )
        .bind(day.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_entry).collect()
    }

    pub async fn get_entry(&self, id: i64) -> Result<EntryWithServer, DbCheckError> {
        let row = sqlx::query(
            r#"SELECT e.id, e.date, e.server_id, e.table_name, e.insert_status,
                      e.update_status, e.delete_status, e.message_error, e.sys_type,
                      s.id AS s_id, s.name AS s_name
               FROM checklist_entries e
               JOIN servers s ON s.id = e.server_id
               WHERE e.id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Self::row_to_entry(row),
            None => Err(Self::entry_not_found(id)),
        }
    }

    /// Insert a new entry. The UNIQUE(entry_day, server_id, table_name)
    /// constraint is the sole guard against duplicates, so a losing racer
    /// fails atomically instead of check-then-insert.
    pub async fn create_entry(&self, new: NewEntry) -> Result<EntryWithServer, DbCheckError> {
        let res = sqlx::query(
            r#"INSERT INTO checklist_entries (
                   date, entry_day, server_id, table_name,
                   insert_status, update_status, delete_status,
                   message_error, sys_type
               ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(new.date.to_rfc3339())
        .bind(day_key(&new.date))
        .bind(new.server_id)
        .bind(new.table_name)
        .bind(flag_to_db(new.insert_status))
        .bind(flag_to_db(new.update_status))
        .bind(flag_to_db(new.delete_status))
        .bind(new.message_error)
        .bind(new.sys_type)
        .execute(&self.pool)
        .await
        .map_err(Self::map_constraint_err)?;

        self.get_entry(res.last_insert_rowid()).await
    }

    /// Full-record replace: every column is written from `new`, omitted
    /// optional fields become NULL. Never a partial patch.
    pub async fn update_entry(
        &self,
        id: i64,
        new: NewEntry,
    ) -> Result<EntryWithServer, DbCheckError> {
        let res = sqlx::query(
            r#"UPDATE checklist_entries SET
                   date = ?,
                   entry_day = ?,
                   server_id = ?,
                   table_name = ?,
                   insert_status = ?,
                   update_status = ?,
                   delete_status = ?,
                   message_error = ?,
                   sys_type = ?
               WHERE id = ?"#,
        )
        .bind(new.date.to_rfc3339())
        .bind(day_key(&new.date))
        .bind(new.server_id)
        .bind(new.table_name)
        .bind(flag_to_db(new.insert_status))
        .bind(flag_to_db(new.update_status))
        .bind(flag_to_db(new.delete_status))
        .bind(new.message_error)
        .bind(new.sys_type)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Self::map_constraint_err)?;

        if res.rows_affected() == 0 {
            return Err(Self::entry_not_found(id));
        }
        self.get_entry(id).await
    }

    /// Delete is not idempotent: a second delete of the same id surfaces
    /// the not-found condition.
    pub async fn delete_entry(&self, id: i64) -> Result<(), DbCheckError> {
        let res = sqlx::query("DELETE FROM checklist_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Self::entry_not_found(id));
        }
        Ok(())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>, DbCheckError> {
        let row = sqlx::query(
            "SELECT id, email, name, password_hash, role FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<DbUser, DbCheckError> {
        let res = sqlx::query(
            "INSERT INTO users (email, name, password_hash, role) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DbCheckError::Conflict(format!("a user with email '{email}' already exists"))
            } else {
                e.into()
            }
        })?;

        Ok(DbUser {
            id: res.last_insert_rowid(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            role,
        })
    }

    fn map_constraint_err(e: sqlx::Error) -> DbCheckError {
        if is_unique_violation(&e) {
            return DbCheckError::Conflict(
                "an entry already exists for this date, server, and table".to_string(),
            );
        }
        if is_foreign_key_violation(&e) {
            return DbCheckError::Validation(
                "serverId does not reference a known server".to_string(),
            );
        }
        e.into()
    }

    fn entry_not_found(id: i64) -> DbCheckError {
        DbCheckError::NotFound(format!("checklist entry {id} does not exist"))
    }

    fn row_to_server(row: SqliteRow) -> Result<DbServer, DbCheckError> {
        Ok(DbServer {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }

    fn row_to_user(row: SqliteRow) -> Result<DbUser, DbCheckError> {
        let role: String = row.try_get("role")?;
        Ok(DbUser {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            password_hash: row.try_get("password_hash")?,
            role: Role::from_db(&role),
        })
    }

    fn row_to_entry(row: SqliteRow) -> Result<EntryWithServer, DbCheckError> {
        let date_str: String = row.try_get("date")?;
        let date: DateTime<Utc> = DateTime::parse_from_rfc3339(&date_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        let entry = DbEntry {
            id: row.try_get("id")?,
            date,
            server_id: row.try_get("server_id")?,
            table_name: row.try_get("table_name")?,
            insert_status: flag_from_db(row.try_get("insert_status")?),
            update_status: flag_from_db(row.try_get("update_status")?),
            delete_status: flag_from_db(row.try_get("delete_status")?),
            message_error: row.try_get("message_error")?,
            sys_type: row.try_get("sys_type")?,
        };
        let server = DbServer {
            id: row.try_get("s_id")?,
            name: row.try_get("s_name")?,
        };
        Ok(EntryWithServer { entry, server })
    }
}

fn flag_to_db(flag: Option<bool>) -> Option<i64> {
    flag.map(|b| if b { 1 } else { 0 })
}

fn flag_from_db(v: Option<i64>) -> Option<bool> {
    v.map(|i| i != 0)
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
