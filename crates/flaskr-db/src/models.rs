/// Database row types — these map directly to SQLite rows.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// A post joined with its author's username, as returned by the listing
/// and single-post queries.
pub struct PostRow {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub created: String,
    pub title: String,
    pub body: String,
}
