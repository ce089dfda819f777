//! Handler for the public redirect path.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;

use crate::application::services::Resolution;
use crate::domain::entities::{RedirectTarget, VisitEvent};
use crate::state::AppState;

const NOT_FOUND_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Link Not Found</title>
  <meta charset="utf-8">
  <style>
    body { font-family: sans-serif; text-align: center; padding: 50px; }
    h1 { color: #333; }
  </style>
</head>
<body>
  <h1>404 - Link Not Found</h1>
  <p>This short link does not exist or has expired.</p>
</body>
</html>"#;

/// Resolves a slug and redirects with the link's configured status.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// The resolver walks edge cache, fast cache, then store. On success a visit
/// event is queued for the background worker; the redirect is returned
/// without waiting for it, and a full queue drops the event.
///
/// Absent and expired slugs both render the 404 page.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let now = Utc::now().timestamp();

    match state.resolver.resolve(&slug, now).await {
        Resolution::Redirect(redirect) => {
            let event = VisitEvent::new(
                slug,
                header_str(&headers, header::REFERER.as_str()),
                header_str(&headers, "cf-ipcountry"),
                header_str(&headers, header::USER_AGENT.as_str()),
                now,
            );
            let _ = state.visit_tx.try_send(event);

            redirect_response(&redirect)
        }
        Resolution::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn redirect_response(redirect: &RedirectTarget) -> Response {
    // The status was validated against {301, 302, 307, 308} at write time.
    let status = StatusCode::from_u16(redirect.status as u16).unwrap_or(StatusCode::FOUND);
    (status, [(header::LOCATION, redirect.target.clone())]).into_response()
}
