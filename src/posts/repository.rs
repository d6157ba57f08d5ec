// Repository pattern - isolates all post persistence side effects.

use rusqlite::{params, params_from_iter, Connection};

use crate::error::{AppError, AppResult};
use crate::posts::model::Post;
use crate::posts::query::PostQuery;
use crate::posts::search::parse_search;
use crate::posts::tags::{
    get_or_create_tag, link_tag, normalize_tags, tags_by_post_ids, unlink_all_tags,
};
use crate::state::DbPool;

const SELECT_POST_BY_ID: &str = "SELECT p.id, p.title, p.text, p.likes_count, \
     COUNT(c.id) AS comments_count, p.created_at, p.updated_at \
     FROM posts p \
     LEFT JOIN comments c ON c.post_id = p.id \
     WHERE p.id = ?1 \
     GROUP BY p.id";

#[derive(Clone)]
pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Page of posts matching the search string, newest first, plus the
    /// total number of matching posts (independent of pagination).
    pub fn find_all(
        &self,
        search: Option<&str>,
        page_number: i64,
        page_size: i64,
    ) -> AppResult<(Vec<Post>, i64)> {
        let criteria = parse_search(search);
        let query = PostQuery::build(&criteria, page_number, page_size);

        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&query.page_sql)?;
        let mut posts = stmt
            .query_map(params_from_iter(query.page_params.iter()), Post::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);

        let total_count: i64 = conn.query_row(
            &query.count_sql,
            params_from_iter(query.count_params.iter()),
            |row| row.get(0),
        )?;

        Self::attach_tags(&conn, &mut posts)?;

        Ok((posts, total_count))
    }

    pub fn find_by_id(&self, post_id: i64) -> AppResult<Option<Post>> {
        let conn = self.pool.get()?;
        Self::fetch_by_id(&conn, post_id)
    }

    /// Insert a post with its normalized tag set. The post row, any new tag
    /// rows and the links are committed together or not at all.
    pub fn create(&self, title: &str, text: &str, tags: &[String]) -> AppResult<Post> {
        let mut conn = self.pool.get()?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO posts (title, text, likes_count) VALUES (?1, ?2, 0)",
            params![title, text],
        )?;
        let post_id = tx.last_insert_rowid();
        Self::apply_tags(&tx, post_id, tags)?;
        tx.commit()?;

        Self::fetch_by_id(&conn, post_id)?
            .ok_or_else(|| AppError::Internal(format!("created post {post_id} not readable")))
    }

    /// Update title/text and replace the tag set wholesale. Returns `None`
    /// when the post does not exist; the zero-rows-affected update is the
    /// existence signal, so nothing is checked-then-updated. The unlink and
    /// re-link run in the same transaction as the update.
    pub fn update(
        &self,
        post_id: i64,
        title: &str,
        text: &str,
        tags: &[String],
    ) -> AppResult<Option<Post>> {
        let mut conn = self.pool.get()?;

        let tx = conn.transaction()?;
        let rows = tx.execute(
            "UPDATE posts SET title = ?1, text = ?2, updated_at = datetime('now') WHERE id = ?3",
            params![title, text, post_id],
        )?;
        if rows == 0 {
            // Dropping the transaction rolls back; no tag mutation happens.
            return Ok(None);
        }

        unlink_all_tags(&tx, post_id)?;
        Self::apply_tags(&tx, post_id, tags)?;
        tx.commit()?;

        Self::fetch_by_id(&conn, post_id)
    }

    /// True when a row was removed. Comments and tag links disappear with
    /// the post via the schema's ON DELETE CASCADE.
    pub fn delete(&self, post_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM posts WHERE id = ?1", params![post_id])?;
        Ok(rows > 0)
    }

    /// Increment the like count by exactly one. The read-modify-write is a
    /// single UPDATE at the storage layer, so concurrent likes never lose
    /// an increment.
    pub fn add_like(&self, post_id: i64) -> AppResult<Option<Post>> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE posts SET likes_count = likes_count + 1, updated_at = datetime('now') \
             WHERE id = ?1",
            params![post_id],
        )?;
        if rows == 0 {
            return Ok(None);
        }

        Self::fetch_by_id(&conn, post_id)
    }

    fn fetch_by_id(conn: &Connection, post_id: i64) -> AppResult<Option<Post>> {
        let result = conn.query_row(SELECT_POST_BY_ID, params![post_id], Post::from_row);

        match result {
            Ok(mut post) => {
                let mut tag_map = tags_by_post_ids(conn, &[post_id])?;
                post.tags = tag_map.remove(&post_id).unwrap_or_default();
                Ok(Some(post))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn attach_tags(conn: &Connection, posts: &mut [Post]) -> AppResult<()> {
        if posts.is_empty() {
            return Ok(());
        }

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let mut tag_map = tags_by_post_ids(conn, &post_ids)?;
        for post in posts {
            post.tags = tag_map.remove(&post.id).unwrap_or_default();
        }

        Ok(())
    }

    fn apply_tags(conn: &Connection, post_id: i64, tags: &[String]) -> rusqlite::Result<()> {
        for name in normalize_tags(tags) {
            let tag_id = get_or_create_tag(conn, &name)?;
            link_tag(conn, post_id, tag_id)?;
        }
        Ok(())
    }
}
