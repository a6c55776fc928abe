use rusqlite::{Connection, OptionalExtension};

use crate::models::{PostRow, UserRow};
use crate::{Database, Result, StoreError};

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            match conn.execute(
                "INSERT INTO user (username, password) VALUES (?1, ?2)",
                (username, password_hash),
            ) {
                Ok(_) => Ok(conn.last_insert_rowid()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::UsernameTaken)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", (username,)))
    }

    pub fn user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", (id,)))
    }

    // -- Posts --

    pub fn create_post(&self, title: &str, body: &str, author_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO post (title, body, author_id) VALUES (?1, ?2, ?3)",
                (title, body, author_id),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_posts(&self) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.author_id, u.username, p.created, p.title, p.body
                 FROM post p JOIN user u ON p.author_id = u.id
                 ORDER BY p.created DESC",
            )?;

            let rows = stmt
                .query_map([], post_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn post_by_id(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.author_id, u.username, p.created, p.title, p.body
                 FROM post p JOIN user u ON p.author_id = u.id
                 WHERE p.id = ?1",
            )?;

            let row = stmt.query_row([id], post_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn update_post(&self, id: i64, title: &str, body: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE post SET title = ?1, body = ?2 WHERE id = ?3",
                (title, body, id),
            )?;
            Ok(())
        })
    }

    pub fn delete_post(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM post WHERE id = ?1", (id,))?;
            Ok(())
        })
    }
}

fn query_user<P: rusqlite::Params>(
    conn: &Connection,
    filter: &str,
    params: P,
) -> Result<Option<UserRow>> {
    let sql = format!("SELECT id, username, password FROM user WHERE {filter}");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row(params, |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn post_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        author_id: row.get(1)?,
        author_username: row.get(2)?,
        created: row.get(3)?,
        title: row.get(4)?,
        body: row.get(5)?,
    })
}
