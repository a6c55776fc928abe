use askama::Template;
use axum::response::Html;
use chrono::NaiveDateTime;

use flaskr_db::models::PostRow;

use crate::error::PageError;
use crate::session::CurrentUser;

/// A post as the templates see it: author username joined in, creation
/// timestamp already reduced to a display date.
pub struct PostView {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub created: String,
    pub title: String,
    pub body: String,
}

impl From<PostRow> for PostView {
    fn from(row: PostRow) -> Self {
        Self {
            created: created_date(&row.created),
            id: row.id,
            author_id: row.author_id,
            author_username: row.author_username,
            title: row.title,
            body: row.body,
        }
    }
}

/// SQLite stores `datetime('now')` as "YYYY-MM-DD HH:MM:SS"; only the date
/// part is shown. Unparseable values fall through verbatim.
fn created_date(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date().format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[derive(Template)]
#[template(path = "blog/index.html")]
pub struct IndexPage {
    pub current_user: Option<CurrentUser>,
    pub posts: Vec<PostView>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
pub struct RegisterPage {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginPage {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "blog/create.html")]
pub struct CreatePage {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub title: String,
    pub body: String,
}

#[derive(Template)]
#[template(path = "blog/update.html")]
pub struct UpdatePage {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub post: PostView,
    pub title: String,
    pub body: String,
}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, PageError> {
    let html = page
        .render()
        .map_err(|e| PageError::Internal(anyhow::Error::new(e)))?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::created_date;

    #[test]
    fn created_date_strips_the_time_part() {
        assert_eq!(created_date("2018-01-01 00:00:00"), "2018-01-01");
    }

    #[test]
    fn created_date_passes_garbage_through() {
        assert_eq!(created_date("not a timestamp"), "not a timestamp");
    }
}
