// Builds the filtered, paginated page query and the matching count query
// for post search. Both queries share the same WHERE construction so the
// reported total is always consistent with the page actually returned.

use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;

use crate::posts::search::SearchCriteria;

/// Positional parameter for dynamically assembled SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::Text(s) => s.to_sql(),
            SqlParam::Int(i) => i.to_sql(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostQuery {
    pub page_sql: String,
    pub page_params: Vec<SqlParam>,
    pub count_sql: String,
    pub count_params: Vec<SqlParam>,
}

impl PostQuery {
    /// Assemble the page and count queries for the given criteria.
    ///
    /// The page query always left-joins comments for the per-post comment
    /// count and orders newest-first (`created_at DESC`, ties broken by
    /// `id DESC` since created_at is second-resolution). With tag filters
    /// the post/tag join multiplies rows, so AND-semantics across tags is
    /// enforced post-grouping: a post matches only when the number of
    /// distinct matching tag names equals the number of requested tags.
    pub fn build(criteria: &SearchCriteria, page_number: i64, page_size: i64) -> Self {
        let tag_count = criteria.tags.len() as i64;
        let filter_by_tags = criteria.has_tags();

        let mut where_parts: Vec<String> = Vec::new();
        let mut filter_params: Vec<SqlParam> = Vec::new();

        if let Some(title_query) = &criteria.title_query {
            where_parts.push("LOWER(p.title) LIKE LOWER(?)".to_string());
            filter_params.push(SqlParam::Text(format!("%{title_query}%")));
        }

        if filter_by_tags {
            let placeholders = vec!["?"; criteria.tags.len()].join(", ");
            where_parts.push(format!("t.name IN ({placeholders})"));
            filter_params.extend(criteria.tags.iter().cloned().map(SqlParam::Text));
        }

        let tag_join = "JOIN post_tags pt ON pt.post_id = p.id \
                        JOIN tags t ON t.id = pt.tag_id ";
        let where_clause = if where_parts.is_empty() {
            String::new()
        } else {
            format!("WHERE {} ", where_parts.join(" AND "))
        };

        // Page query. Under a tag filter the join repeats comment rows per
        // matched tag, so the comment count must be distinct-counted.
        let comments_count = if filter_by_tags {
            "COUNT(DISTINCT c.id)"
        } else {
            "COUNT(c.id)"
        };
        let mut page_sql = format!(
            "SELECT p.id, p.title, p.text, p.likes_count, \
             {comments_count} AS comments_count, p.created_at, p.updated_at \
             FROM posts p \
             LEFT JOIN comments c ON c.post_id = p.id ",
        );
        if filter_by_tags {
            page_sql.push_str(tag_join);
        }
        page_sql.push_str(&where_clause);
        page_sql.push_str("GROUP BY p.id ");

        let mut page_params = filter_params.clone();
        if filter_by_tags {
            page_sql.push_str("HAVING COUNT(DISTINCT t.name) = ? ");
            page_params.push(SqlParam::Int(tag_count));
        }

        page_sql.push_str("ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?");
        let offset = (page_number - 1).max(0) * page_size;
        page_params.push(SqlParam::Int(page_size));
        page_params.push(SqlParam::Int(offset));

        // Count query. With zero or one tag a flat count is exact; with
        // two or more the grouped HAVING result itself must be counted,
        // otherwise the row-multiplying join inflates the total.
        let (count_sql, count_params) = if tag_count >= 2 {
            let inner = format!(
                "SELECT p.id FROM posts p {tag_join}{where_clause}\
                 GROUP BY p.id HAVING COUNT(DISTINCT t.name) = ?"
            );
            let mut count_params = filter_params;
            count_params.push(SqlParam::Int(tag_count));
            (
                format!("SELECT COUNT(*) FROM ({inner}) matched"),
                count_params,
            )
        } else {
            let mut count_sql = String::from("SELECT COUNT(*) FROM posts p ");
            if filter_by_tags {
                count_sql.push_str(tag_join);
            }
            count_sql.push_str(where_clause.trim_end());
            (count_sql.trim_end().to_string(), filter_params)
        };

        Self {
            page_sql,
            page_params,
            count_sql,
            count_params,
        }
    }
}
