mod common;

use axum::http::{StatusCode, header};

use common::*;

#[tokio::test]
async fn register_renders_and_creates_a_user() {
    let (app, state) = test_app();

    let res = send(&app, get("/auth/register")).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(&app, post_form("/auth/register", "username=a&password=a", None)).await;
    assert_eq!(location(&res), "/auth/login");

    let user = state.db.user_by_username("a").unwrap();
    assert!(user.is_some());
}

#[tokio::test]
async fn register_rejects_missing_fields_without_inserting() {
    let (app, state) = test_app();

    for (form, message) in [
        ("username=&password=", "Username is required."),
        ("username=a&password=", "Password is required."),
    ] {
        let res = send(&app, post_form("/auth/register", form, None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_text(res).await.contains(message));
    }

    // Only the two seeded users exist.
    let users: i64 = state
        .db
        .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(id) FROM user", [], |row| row.get(0))?))
        .unwrap();
    assert_eq!(users, 2);
}

#[tokio::test]
async fn register_reports_duplicate_username_as_conflict() {
    let (app, state) = test_app();

    let res = send(&app, post_form("/auth/register", "username=test&password=test", None)).await;
    assert!(body_text(res).await.contains("User test is already registered."));

    let rows: i64 = state
        .db
        .with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(id) FROM user WHERE username = 'test'",
                [],
                |row| row.get(0),
            )?)
        })
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn login_establishes_a_session() {
    let (app, _state) = test_app();

    let res = send(&app, get("/auth/login")).await;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = login(&app, "test", "test").await;

    // The signed cookie now resolves to the logged-in user on every page.
    let res = send(&app, get_with_cookie("/", &cookie)).await;
    let body = body_text(res).await;
    assert!(body.contains("Log Out"));
    assert!(body.contains("test"));
}

#[tokio::test]
async fn login_rejects_bad_credentials_without_a_session() {
    let (app, _state) = test_app();

    for (form, message) in [
        ("username=unknown&password=test", "Incorrect username."),
        ("username=test&password=wrong", "Incorrect password."),
    ] {
        let res = send(&app, post_form("/auth/login", form, None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
        assert!(body_text(res).await.contains(message));
    }
}

#[tokio::test]
async fn logout_discards_the_session() {
    let (app, _state) = test_app();
    let cookie = login(&app, "test", "test").await;

    let res = send(&app, get_with_cookie("/auth/logout", &cookie)).await;
    assert_eq!(location(&res), "/");

    // The response replaces the session cookie with an expired one.
    let removal = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(removal.starts_with("user_id="));
    assert!(removal.contains("Max-Age=0"));
}

#[tokio::test]
async fn logout_works_without_a_session() {
    let (app, _state) = test_app();

    let res = send(&app, get("/auth/logout")).await;
    assert_eq!(location(&res), "/");
}
