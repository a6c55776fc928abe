use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn reset(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        DROP TABLE IF EXISTS post;
        DROP TABLE IF EXISTS user;

        CREATE TABLE user (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL
        );

        CREATE TABLE post (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            author_id   INTEGER NOT NULL,
            created     TEXT NOT NULL DEFAULT (datetime('now')),
            title       TEXT NOT NULL,
            body        TEXT NOT NULL DEFAULT ''
        );
        ",
    )?;

    info!("Schema reset complete");
    Ok(())
}
