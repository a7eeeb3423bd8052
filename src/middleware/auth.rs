use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};

use crate::error::DbCheckError;
use crate::session::{self, SessionClaims};

/// Extractor guarding every protected route: yields the session claims or
/// rejects the request. API paths get 401 JSON, page loads are redirected
/// to the sign-in page. A protected payload is never served without a
/// valid, unexpired session.
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionClaims);

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(err) => match err {},
        };

        match session::claims_from_jar(&jar) {
            Some(claims) => Ok(Self(claims)),
            None => Err(reject(parts.uri.path())),
        }
    }
}

fn is_api_path(path: &str) -> bool {
    path.starts_with("/checklist") || path.starts_with("/servers") || path.starts_with("/auth/")
}

fn reject(path: &str) -> Response {
    if is_api_path(path) {
        DbCheckError::Unauthenticated.into_response()
    } else {
        Redirect::to("/auth/signin").into_response()
    }
}
