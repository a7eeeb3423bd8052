//! Session gate: credential verification and the stateless session cookie.
//!
//! The cookie is encrypted and authenticated by axum-extra's
//! `PrivateCookieJar`; it is the sole proof of authentication, there is no
//! server-side session table. Revocation before expiry is therefore not
//! possible; sign-out only clears the browser's copy.

pub mod password;

use crate::db::models::{DbUser, Role};
use crate::db::sqlite::ChecklistStorage;
use crate::error::DbCheckError;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::warn;

pub const SESSION_COOKIE: &str = "dbcheck_session";

/// Identity carried by the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Unix timestamp after which the session is no longer honored.
    pub exp: i64,
}

impl SessionClaims {
    pub fn issue(user: &DbUser, ttl_hours: i64) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: Utc::now().timestamp() + ttl_hours * 3600,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Check an email/password pair against the stored bcrypt hash.
///
/// Unknown email and wrong password both yield the identical `AuthFailed`;
/// the unknown-email path still runs a bcrypt verification so timing does
/// not reveal whether the account exists.
pub async fn verify_credentials(
    storage: &ChecklistStorage,
    email: &str,
    password: &str,
) -> Result<DbUser, DbCheckError> {
    let Some(user) = storage.find_user_by_email(email).await? else {
        let _ = password::verify(password, password::DUMMY_HASH);
        return Err(DbCheckError::AuthFailed);
    };

    match password::verify(password, &user.password_hash) {
        Ok(true) => Ok(user),
        Ok(false) => Err(DbCheckError::AuthFailed),
        Err(e) => {
            warn!(email = %email, error = %e, "stored password hash could not be verified");
            Err(DbCheckError::AuthFailed)
        }
    }
}

/// Store the claims in the private session cookie.
pub fn establish(
    jar: PrivateCookieJar,
    claims: &SessionClaims,
    ttl_hours: i64,
) -> Result<PrivateCookieJar, DbCheckError> {
    let payload = serde_json::to_string(claims)?;
    let cookie = Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), payload))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(ttl_hours))
        .build();
    Ok(jar.add(cookie))
}

pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
    let cookie = Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.remove(cookie)
}

/// Read valid claims out of the jar, if any. Expired or undecodable
/// sessions count as absent.
pub fn claims_from_jar(jar: &PrivateCookieJar) -> Option<SessionClaims> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let claims: SessionClaims = serde_json::from_str(cookie.value()).ok()?;
    (!claims.is_expired()).then_some(claims)
}
