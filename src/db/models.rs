use crate::error::DbCheckError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbServer {
    pub id: i64,
    pub name: String,
}

/// A checklist row as stored. The three status flags are independent
/// tri-state values: `Some(true)` = attempted and succeeded, `Some(false)` =
/// attempted and failed, `None` = not applicable that day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DbEntry {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub server_id: i64,
    pub table_name: String,
    pub insert_status: Option<bool>,
    pub update_status: Option<bool>,
    pub delete_status: Option<bool>,
    pub message_error: Option<String>,
    pub sys_type: Option<String>,
}

/// A checklist row joined with its server, the shape every read returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryWithServer {
    #[serde(flatten)]
    pub entry: DbEntry,
    pub server: DbServer,
}

/// Validated field set for a create or a full-replace update.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub date: DateTime<Utc>,
    pub server_id: i64,
    pub table_name: String,
    pub insert_status: Option<bool>,
    pub update_status: Option<bool>,
    pub delete_status: Option<bool>,
    pub message_error: Option<String>,
    pub sys_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn from_db(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

/// Parse a client-supplied date: either a full RFC3339 timestamp or a bare
/// `YYYY-MM-DD` (taken as midnight UTC). Days are pinned to UTC everywhere,
/// so the list filter and the uniqueness key agree across deployments.
pub fn parse_entry_date(raw: &str) -> Result<DateTime<Utc>, DbCheckError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(day.and_time(NaiveTime::MIN).and_utc());
    }
    Err(DbCheckError::Validation(format!(
        "invalid date '{raw}': expected YYYY-MM-DD or an RFC3339 timestamp"
    )))
}

pub fn parse_day(raw: &str) -> Result<NaiveDate, DbCheckError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DbCheckError::Validation(format!("invalid date '{raw}': expected YYYY-MM-DD"))
    })
}

/// Calendar-day key of a timestamp, in UTC.
pub fn day_key(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}
