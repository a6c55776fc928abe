pub mod auth;
pub mod blog;
pub mod error;
pub mod session;
pub mod state;
pub mod views;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

pub use state::AppState;

/// Assembles the full application router: public auth + listing routes,
/// mutating blog routes behind the login guard, and the current-user
/// loader wrapped around everything.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(blog::index))
        .route(
            "/auth/register",
            get(auth::register_form).post(auth::register),
        )
        .route("/auth/login", get(auth::login_form).post(auth::login))
        .route("/auth/logout", get(auth::logout));

    let protected = Router::new()
        .route("/create", get(blog::create_form).post(blog::create))
        .route("/{id}/update", get(blog::update_form).post(blog::update))
        .route("/{id}/delete", post(blog::delete))
        .layer(middleware::from_fn(session::require_login));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::load_current_user,
        ))
        .with_state(state)
}
