use axum::Json;
use axum::extract::State;

use crate::db::models::DbServer;
use crate::error::DbCheckError;
use crate::middleware::RequireSession;
use crate::router::DbCheckState;

/// GET /servers -> the fixed reference servers, ordered by name.
pub async fn list_servers(
    State(state): State<DbCheckState>,
    _session: RequireSession,
) -> Result<Json<Vec<DbServer>>, DbCheckError> {
    let servers = state.storage.list_servers().await?;
    Ok(Json(servers))
}
