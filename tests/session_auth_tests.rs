use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use axum_extra::extract::cookie::Key;
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use dbcheck::db::Role;
use dbcheck::router::{DbCheckState, dbcheck_router};

async fn spawn_app(tag: &str, session_ttl_hours: i64) -> (Router, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "dbcheck-auth-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let storage = dbcheck::db::spawn(&database_url)
        .await
        .expect("failed to open test database");

    let hash = bcrypt::hash("correct-horse", 4).expect("failed to hash test password");
    storage
        .create_user("realuser@x.com", "Real User", &hash, Role::Admin)
        .await
        .expect("failed to create test user");

    let state = DbCheckState::new(storage, Key::generate(), session_ttl_hours);
    (dbcheck_router(state), temp_path)
}

fn signin_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/signin")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": email, "password": password }).to_string(),
        ))
        .expect("failed to build request")
}

async fn signin_cookie(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(signin_request("realuser@x.com", "correct-horse"))
        .await
        .expect("signin request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("signin response set no cookie")
        .to_str()
        .expect("set-cookie was not utf-8");
    set_cookie
        .split(';')
        .next()
        .expect("empty set-cookie header")
        .to_string()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body")
        .to_vec()
}

#[tokio::test]
async fn signin_sets_cookie_and_returns_the_user() {
    let (app, path) = spawn_app("signin-ok", 8).await;

    let resp = app
        .clone()
        .oneshot(signin_request("realuser@x.com", "correct-horse"))
        .await
        .expect("signin request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("no session cookie set")
        .to_str()
        .expect("set-cookie was not utf-8")
        .to_string();
    assert!(set_cookie.starts_with("dbcheck_session="));
    assert!(set_cookie.contains("HttpOnly"));

    let body: Value =
        serde_json::from_slice(&body_bytes(resp).await).expect("response body was not JSON");
    assert_eq!(body["email"], "realuser@x.com");
    assert_eq!(body["role"], "admin");
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let (app, path) = spawn_app("generic-failure", 8).await;

    let unknown = app
        .clone()
        .oneshot(signin_request("nouser@x.com", "anything"))
        .await
        .expect("signin request failed");
    let wrong = app
        .clone()
        .oneshot(signin_request("realuser@x.com", "wrongpass"))
        .await
        .expect("signin request failed");

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    // Byte-identical bodies: no signal distinguishes the two failures.
    assert_eq!(body_bytes(unknown).await, body_bytes(wrong).await);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn protected_api_without_session_is_401() {
    let (app, path) = spawn_app("api-401", 8).await;

    for uri in ["/checklist?date=2024-01-15", "/servers", "/auth/session"] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "uri {uri}");
    }

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn page_load_without_session_redirects_to_signin() {
    let (app, path) = spawn_app("page-redirect", 8).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get(header::LOCATION)
            .expect("redirect without location")
            .to_str()
            .expect("location was not utf-8"),
        "/auth/signin"
    );

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn expired_session_is_rejected() {
    // TTL of zero hours: the issued token is already past its expiry.
    let (app, path) = spawn_app("expired", 0).await;
    let cookie = signin_cookie(&app).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/checklist?date=2024-01-15")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn valid_session_reaches_protected_routes() {
    let (app, path) = spawn_app("authorized", 8).await;
    let cookie = signin_cookie(&app).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth/session")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value =
        serde_json::from_slice(&body_bytes(resp).await).expect("response body was not JSON");
    assert_eq!(body["email"], "realuser@x.com");
    assert_eq!(body["name"], "Real User");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn signout_clears_the_session_cookie() {
    let (app, path) = spawn_app("signout", 8).await;
    let cookie = signin_cookie(&app).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("signout request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("signout set no removal cookie")
        .to_str()
        .expect("set-cookie was not utf-8");
    assert!(set_cookie.starts_with("dbcheck_session="));
    assert!(set_cookie.contains("Max-Age=0") || set_cookie.contains("Expires="));

    let _ = fs::remove_file(&path);
}
