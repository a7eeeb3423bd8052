//! Minimal HTML shells. The dashboard UI proper is served elsewhere; these
//! exist so unauthenticated page loads have a sign-in surface to land on.

use axum::response::Html;

use crate::middleware::RequireSession;

pub async fn index(RequireSession(claims): RequireSession) -> Html<String> {
    Html(format!(
        "<!doctype html><title>dbcheck</title><p>Signed in as {}.</p>",
        claims.name
    ))
}

pub async fn signin_page() -> Html<&'static str> {
    Html("<!doctype html><title>dbcheck sign in</title><p>POST credentials to /auth/signin.</p>")
}
