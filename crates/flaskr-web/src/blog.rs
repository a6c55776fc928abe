use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use serde::Deserialize;

use flaskr_db::models::PostRow;

use crate::error::PageError;
use crate::session::CurrentUser;
use crate::state::AppState;
use crate::views::{CreatePage, IndexPage, PostView, UpdatePage, render};

#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

pub async fn index(
    State(state): State<AppState>,
    Extension(current_user): Extension<Option<CurrentUser>>,
) -> Result<Html<String>, PageError> {
    let posts = state
        .db
        .list_posts()?
        .into_iter()
        .map(PostView::from)
        .collect();

    render(&IndexPage {
        current_user,
        posts,
    })
}

pub async fn create_form(
    Extension(current_user): Extension<Option<CurrentUser>>,
) -> Result<Html<String>, PageError> {
    render(&CreatePage {
        current_user,
        error: None,
        title: String::new(),
        body: String::new(),
    })
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<Option<CurrentUser>>,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    let author = require_user(&current_user)?;

    if form.title.is_empty() {
        let page = CreatePage {
            current_user,
            error: Some("Title is required.".to_string()),
            title: form.title,
            body: form.body,
        };
        return Ok(render(&page)?.into_response());
    }

    state.db.create_post(&form.title, &form.body, author)?;
    Ok(Redirect::to("/").into_response())
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<Option<CurrentUser>>,
) -> Result<Html<String>, PageError> {
    let post = PostView::from(fetch_post(&state, id, &current_user, true)?);
    let page = UpdatePage {
        current_user,
        error: None,
        title: post.title.clone(),
        body: post.body.clone(),
        post,
    };
    render(&page)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<Option<CurrentUser>>,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    let post = fetch_post(&state, id, &current_user, true)?;

    if form.title.is_empty() {
        let page = UpdatePage {
            current_user,
            error: Some("Title is required.".to_string()),
            title: form.title,
            body: form.body,
            post: PostView::from(post),
        };
        return Ok(render(&page)?.into_response());
    }

    state.db.update_post(id, &form.title, &form.body)?;
    Ok(Redirect::to("/").into_response())
}

/// POST only; the delete button lives on the update page, there is no
/// confirmation view of its own.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current_user): Extension<Option<CurrentUser>>,
) -> Result<Response, PageError> {
    fetch_post(&state, id, &current_user, true)?;
    state.db.delete_post(id)?;
    Ok(Redirect::to("/").into_response())
}

/// Shared gate for update and delete: 404 when the post is missing, 403
/// when `check_author` is set and the current user is not the author.
fn fetch_post(
    state: &AppState,
    id: i64,
    current: &Option<CurrentUser>,
    check_author: bool,
) -> Result<PostRow, PageError> {
    let post = state
        .db
        .post_by_id(id)?
        .ok_or_else(|| PageError::NotFound(format!("Post id {id} doesn't exist.")))?;

    if check_author && current.as_ref().map(|u| u.id) != Some(post.author_id) {
        return Err(PageError::Forbidden);
    }

    Ok(post)
}

/// The require_login middleware guarantees a user on these routes; hitting
/// this error means the router wiring is broken.
fn require_user(current: &Option<CurrentUser>) -> Result<i64, PageError> {
    current
        .as_ref()
        .map(|u| u.id)
        .ok_or_else(|| PageError::Internal(anyhow::anyhow!("authenticated route reached without a user")))
}
