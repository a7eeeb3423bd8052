use axum::extract::State;
use axum::{Json, response::IntoResponse};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::db::models::{DbUser, Role};
use crate::error::DbCheckError;
use crate::middleware::RequireSession;
use crate::router::DbCheckState;
use crate::session::{self, SessionClaims};

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// User shape returned to the client; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<DbUser> for PublicUser {
    fn from(u: DbUser) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
        }
    }
}

/// POST /auth/signin -> verifies credentials and sets the session cookie.
pub async fn signin(
    State(state): State<DbCheckState>,
    jar: PrivateCookieJar,
    Json(body): Json<SigninRequest>,
) -> Result<impl IntoResponse, DbCheckError> {
    let user = session::verify_credentials(&state.storage, &body.email, &body.password).await?;
    let claims = SessionClaims::issue(&user, state.session_ttl_hours);
    let jar = session::establish(jar, &claims, state.session_ttl_hours)?;

    info!(email = %user.email, "sign-in succeeded");
    Ok((jar, Json(PublicUser::from(user))))
}

/// POST /auth/signout -> clears the session cookie. The token itself stays
/// valid until expiry; only the browser's copy is removed.
pub async fn signout(jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = session::clear(jar);
    (jar, Json(json!({ "message": "Signed out" })))
}

/// GET /auth/session -> the authenticated user behind the current session.
pub async fn current_session(RequireSession(claims): RequireSession) -> Json<PublicUser> {
    Json(PublicUser {
        id: claims.id,
        email: claims.email,
        name: claims.name,
        role: claims.role,
    })
}
