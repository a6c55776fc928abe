use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::Deserialize;

use flaskr_db::StoreError;

use crate::error::PageError;
use crate::session::{CurrentUser, SESSION_USER_ID};
use crate::state::AppState;
use crate::views::{LoginPage, RegisterPage, render};

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

pub async fn register_form(
    Extension(current_user): Extension<Option<CurrentUser>>,
) -> Result<Html<String>, PageError> {
    render(&RegisterPage {
        current_user,
        error: None,
    })
}

/// Validation order matches the form: username first, then password, then
/// the storage-level uniqueness conflict. The first failure wins and no
/// row is written.
pub async fn register(
    State(state): State<AppState>,
    Extension(current_user): Extension<Option<CurrentUser>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PageError> {
    let error = if form.username.is_empty() {
        "Username is required.".to_string()
    } else if form.password.is_empty() {
        "Password is required.".to_string()
    } else {
        let hash = hash_password(&form.password)?;
        match state.db.create_user(&form.username, &hash) {
            Ok(_) => return Ok(Redirect::to("/auth/login").into_response()),
            Err(StoreError::UsernameTaken) => {
                format!("User {} is already registered.", form.username)
            }
            Err(e) => return Err(e.into()),
        }
    };

    Ok(render(&RegisterPage {
        current_user,
        error: Some(error),
    })?
    .into_response())
}

pub async fn login_form(
    Extension(current_user): Extension<Option<CurrentUser>>,
) -> Result<Html<String>, PageError> {
    render(&LoginPage {
        current_user,
        error: None,
    })
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Extension(current_user): Extension<Option<CurrentUser>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PageError> {
    let error = match state.db.user_by_username(&form.username)? {
        None => "Incorrect username.".to_string(),
        Some(user) if !verify_password(&user.password, &form.password) => {
            "Incorrect password.".to_string()
        }
        Some(user) => {
            // Any prior session identity is replaced wholesale.
            let jar = jar
                .remove(Cookie::build(SESSION_USER_ID).path("/"))
                .add(session_cookie(user.id));
            return Ok((jar, Redirect::to("/")).into_response());
        }
    };

    Ok(render(&LoginPage {
        current_user,
        error: Some(error),
    })?
    .into_response())
}

/// Drops the session identity unconditionally, logged in or not.
pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_USER_ID).path("/"));
    (jar, Redirect::to("/"))
}

fn session_cookie(user_id: i64) -> Cookie<'static> {
    Cookie::build((SESSION_USER_ID, user_id.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

pub fn hash_password(password: &str) -> Result<String, PageError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PageError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

pub fn verify_password(stored: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
