// Comment CRUD. Comments live under a post: update and delete take the
// (comment_id, post_id) pair as the ownership key, so a comment reached
// through the wrong post behaves exactly like a missing one.

use rusqlite::{params, Connection, ErrorCode, Row};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::DbPool;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Comment {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            post_id: row.get("post_id")?,
            text: row.get("text")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

const SELECT_COMMENT: &str =
    "SELECT id, post_id, text, created_at, updated_at FROM comments WHERE id = ?1";

#[derive(Clone)]
pub struct CommentRepository {
    pool: DbPool,
}

impl CommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn find_all_by_post_id(&self, post_id: i64) -> AppResult<Vec<Comment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, text, created_at, updated_at \
             FROM comments WHERE post_id = ?1 ORDER BY created_at, id",
        )?;
        let comments = stmt
            .query_map(params![post_id], Comment::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    pub fn find_by_id(&self, comment_id: i64) -> AppResult<Option<Comment>> {
        let conn = self.pool.get()?;
        Self::fetch(&conn, comment_id)
    }

    /// Insert a comment. Returns `None` when the post does not exist: the
    /// foreign key violation on insert is the existence signal, so there is
    /// no check-then-insert race.
    pub fn create(&self, post_id: i64, text: &str) -> AppResult<Option<Comment>> {
        let conn = self.pool.get()?;
        let result = conn.execute(
            "INSERT INTO comments (post_id, text) VALUES (?1, ?2)",
            params![post_id, text],
        );

        match result {
            Ok(_) => Self::fetch(&conn, conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn update(&self, comment_id: i64, post_id: i64, text: &str) -> AppResult<Option<Comment>> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE comments SET text = ?1, updated_at = datetime('now') \
             WHERE id = ?2 AND post_id = ?3",
            params![text, comment_id, post_id],
        )?;
        if rows == 0 {
            return Ok(None);
        }

        Self::fetch(&conn, comment_id)
    }

    pub fn delete(&self, comment_id: i64, post_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "DELETE FROM comments WHERE id = ?1 AND post_id = ?2",
            params![comment_id, post_id],
        )?;
        Ok(rows > 0)
    }

    fn fetch(conn: &Connection, comment_id: i64) -> AppResult<Option<Comment>> {
        match conn.query_row(SELECT_COMMENT, params![comment_id], Comment::from_row) {
            Ok(comment) => Ok(Some(comment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
