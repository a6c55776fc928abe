use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use tracing::warn;

use crate::state::AppState;

/// Session cookie holding the authenticated user's id. One name for both
/// the login write and the per-request read.
pub const SESSION_USER_ID: &str = "user_id";

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Resolves the current user once per request, before any handler runs, and
/// stores it in the request extensions. Absent, unparseable, or stale ids
/// leave the request anonymous.
pub async fn load_current_user(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let user_id = jar
        .get(SESSION_USER_ID)
        .and_then(|cookie| cookie.value().parse::<i64>().ok());

    let current = match user_id {
        None => None,
        Some(id) => match state.db.user_by_id(id) {
            Ok(row) => row.map(|user| CurrentUser {
                id: user.id,
                username: user.username,
            }),
            Err(e) => {
                warn!("failed to resolve session user {id}: {e}");
                None
            }
        },
    };

    req.extensions_mut().insert(current);
    next.run(req).await
}

/// Guard for mutating routes: anonymous requests are redirected to the
/// login form instead of reaching the wrapped handler.
pub async fn require_login(req: Request, next: Next) -> Response {
    match req.extensions().get::<Option<CurrentUser>>() {
        Some(Some(_)) => next.run(req).await,
        _ => Redirect::to("/auth/login").into_response(),
    }
}
