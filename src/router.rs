use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post, put};
use axum_extra::extract::cookie::Key;

use crate::db::sqlite::ChecklistStorage;
use crate::handlers;

/// Shared request state. The storage handle and the cookie key are injected
/// at construction; handlers never reach for process-wide globals, which
/// keeps tests on isolated instances.
#[derive(Clone)]
pub struct DbCheckState {
    pub storage: ChecklistStorage,
    pub session_ttl_hours: i64,
    key: Key,
}

impl DbCheckState {
    pub fn new(storage: ChecklistStorage, key: Key, session_ttl_hours: i64) -> Self {
        Self {
            storage,
            session_ttl_hours,
            key,
        }
    }
}

impl FromRef<DbCheckState> for Key {
    fn from_ref(state: &DbCheckState) -> Key {
        state.key.clone()
    }
}

pub fn dbcheck_router(state: DbCheckState) -> Router {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route(
            "/auth/signin",
            get(handlers::pages::signin_page).post(handlers::auth::signin),
        )
        .route("/auth/signout", post(handlers::auth::signout))
        .route("/auth/session", get(handlers::auth::current_session))
        .route(
            "/checklist",
            get(handlers::checklist::list_entries).post(handlers::checklist::create_entry),
        )
        .route(
            "/checklist/{id}",
            put(handlers::checklist::update_entry).delete(handlers::checklist::delete_entry),
        )
        .route("/servers", get(handlers::servers::list_servers))
        .with_state(state)
}
