//! Shared fixtures for the router tests: an in-memory database seeded with
//! two users (`test`/`test`, `other`/`other`) and one post titled
//! "test title" owned by `test`, plus request/response helpers.

// Not every test binary touches every helper.
#![allow(dead_code)]

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use flaskr_db::Database;
use flaskr_web::AppState;
use flaskr_web::auth::hash_password;

pub const TEST_SECRET: &str = "test-secret";

pub fn test_app() -> (Router, AppState) {
    let db = Database::open(Path::new(":memory:")).unwrap();
    db.init_schema().unwrap();

    db.create_user("test", &hash_password("test").unwrap())
        .unwrap();
    db.create_user("other", &hash_password("other").unwrap())
        .unwrap();

    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO post (title, body, author_id, created)
             VALUES (?1, ?2, 1, '2018-01-01 00:00:00')",
            ("test title", "test\nbody"),
        )?;
        Ok(())
    })
    .unwrap();

    let state = AppState::new(db, TEST_SECRET);
    (flaskr_web::router(state.clone()), state)
}

pub async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_text(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(res: &Response) -> &str {
    res.headers()
        .get(header::LOCATION)
        .expect("expected a redirect")
        .to_str()
        .unwrap()
}

/// The `Set-Cookie` pair from a response, ready to echo back as `Cookie`.
pub fn session_cookie(res: &Response) -> String {
    res.headers()
        .get(header::SET_COOKIE)
        .expect("expected a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// Logs in through the real login route and returns the session cookie.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let res = send(
        app,
        post_form(
            "/auth/login",
            &format!("username={username}&password={password}"),
            None,
        ),
    )
    .await;
    assert_eq!(location(&res), "/");
    session_cookie(&res)
}

pub fn post_count(state: &AppState) -> i64 {
    state
        .db
        .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(id) FROM post", [], |row| row.get(0))?))
        .unwrap()
}
