use rusqlite::Row;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    /// Map a row from the page/single-post query. Tags are attached in a
    /// second, batched query.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            text: row.get("text")?,
            tags: Vec::new(),
            likes_count: row.get("likes_count")?,
            comments_count: row.get("comments_count")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// One page of posts plus the pagination metadata derived from the total
/// number of posts matching the filters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPage {
    pub posts: Vec<Post>,
    pub has_prev: bool,
    pub has_next: bool,
    pub last_page: i64,
}

impl PostsPage {
    pub fn new(posts: Vec<Post>, page_number: i64, page_size: i64, total_count: i64) -> Self {
        let page_size = page_size.max(1);
        let last_page = ((total_count + page_size - 1) / page_size).max(1);
        Self {
            posts,
            has_prev: page_number > 1,
            has_next: page_number < last_page,
            last_page,
        }
    }
}
