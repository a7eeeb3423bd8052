use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::db::models::{EntryWithServer, NewEntry, parse_day, parse_entry_date};
use crate::error::DbCheckError;
use crate::middleware::RequireSession;
use crate::router::DbCheckState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
}

/// Wire payload for create and update. Field names follow the original
/// camelCase API. Update is a full replace: fields the caller omits are
/// written as NULL, never preserved from the prior row.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPayload {
    pub date: Option<String>,
    pub server_id: Option<i64>,
    pub table_name: Option<String>,
    #[serde(default)]
    pub insert_status: Option<bool>,
    #[serde(default)]
    pub update_status: Option<bool>,
    #[serde(default)]
    pub delete_status: Option<bool>,
    pub message_error: Option<String>,
    pub sys_type: Option<String>,
}

impl EntryPayload {
    fn into_new_entry(self) -> Result<NewEntry, DbCheckError> {
        let Some(date) = self.date.as_deref() else {
            return Err(missing("date"));
        };
        let Some(server_id) = self.server_id else {
            return Err(missing("serverId"));
        };
        let table_name = match self.table_name {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(missing("tableName")),
        };

        Ok(NewEntry {
            date: parse_entry_date(date)?,
            server_id,
            table_name,
            insert_status: self.insert_status,
            update_status: self.update_status,
            delete_status: self.delete_status,
            message_error: none_if_empty(self.message_error),
            sys_type: none_if_empty(self.sys_type),
        })
    }
}

fn missing(field: &str) -> DbCheckError {
    DbCheckError::Validation(format!("'{field}' is required"))
}

fn none_if_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// GET /checklist?date=YYYY-MM-DD -> entries for that calendar day (UTC),
/// ordered by server name then table name.
pub async fn list_entries(
    State(state): State<DbCheckState>,
    _session: RequireSession,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<EntryWithServer>>, DbCheckError> {
    let Some(date) = query.date.as_deref() else {
        return Err(DbCheckError::Validation(
            "'date' query parameter is required".to_string(),
        ));
    };
    let day = parse_day(date)?;
    let entries = state.storage.list_for_day(day).await?;
    Ok(Json(entries))
}

/// POST /checklist -> create an entry; 409 when one already exists for the
/// same day, server, and table.
pub async fn create_entry(
    State(state): State<DbCheckState>,
    session: RequireSession,
    Json(payload): Json<EntryPayload>,
) -> Result<Json<EntryWithServer>, DbCheckError> {
    let new = payload.into_new_entry()?;
    let created = state.storage.create_entry(new).await?;
    info!(
        user = %session.0.email,
        entry = created.entry.id,
        server = %created.server.name,
        table = %created.entry.table_name,
        "checklist entry created"
    );
    Ok(Json(created))
}

/// PUT /checklist/{id} -> full-record replace; 404 when the id is unknown.
pub async fn update_entry(
    State(state): State<DbCheckState>,
    session: RequireSession,
    Path(id): Path<i64>,
    Json(payload): Json<EntryPayload>,
) -> Result<Json<EntryWithServer>, DbCheckError> {
    let new = payload.into_new_entry()?;
    let updated = state.storage.update_entry(id, new).await?;
    info!(user = %session.0.email, entry = id, "checklist entry updated");
    Ok(Json(updated))
}

/// DELETE /checklist/{id} -> 404 when the id is unknown, including a repeat
/// delete of an id that was just removed.
pub async fn delete_entry(
    State(state): State<DbCheckState>,
    session: RequireSession,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, DbCheckError> {
    state.storage.delete_entry(id).await?;
    info!(user = %session.0.email, entry = id, "checklist entry deleted");
    Ok(Json(json!({ "message": "Entry deleted successfully" })))
}
