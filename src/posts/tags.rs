// Tag directory - get-or-create tag rows and keep the post_tags
// association in sync. All functions take a borrowed connection so they
// can run inside the repository's transactions.

use rusqlite::{params, params_from_iter, Connection, ErrorCode};
use std::collections::HashMap;

/// Canonicalize a tag list: trim, lowercase, drop blanks, dedupe keeping
/// first-occurrence order. Idempotent.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || normalized.contains(&tag) {
            continue;
        }
        normalized.push(tag);
    }
    normalized
}

fn lookup_tag(conn: &Connection, name: &str) -> rusqlite::Result<Option<i64>> {
    match conn.query_row("SELECT id FROM tags WHERE name = ?1", params![name], |row| {
        row.get(0)
    }) {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Resolve a normalized tag name to its id, inserting the row on first use.
///
/// The tags.name column collates NOCASE, so the lookup is case-insensitive
/// and the unique index guarantees a single row per name. A concurrent
/// writer racing on the insert hits the unique constraint; that is absorbed
/// by re-resolving the name instead of surfacing an error.
pub fn get_or_create_tag(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    if let Some(id) = lookup_tag(conn, name)? {
        return Ok(id);
    }

    match conn.execute("INSERT INTO tags (name) VALUES (?1)", params![name]) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == ErrorCode::ConstraintViolation =>
        {
            lookup_tag(conn, name)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
        }
        Err(e) => Err(e),
    }
}

/// Associate a tag with a post. Idempotent: linking an existing pair is a
/// no-op, never an error.
pub fn link_tag(conn: &Connection, post_id: i64, tag_id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?1, ?2)",
        params![post_id, tag_id],
    )?;
    Ok(())
}

/// Remove every tag association for a post. Used before re-applying the
/// tag set on update. Tag rows themselves are never deleted.
pub fn unlink_all_tags(conn: &Connection, post_id: i64) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM post_tags WHERE post_id = ?1", params![post_id])?;
    Ok(())
}

/// Batch reverse lookup: tag names for a whole page of posts in one query.
pub fn tags_by_post_ids(
    conn: &Connection,
    post_ids: &[i64],
) -> rusqlite::Result<HashMap<i64, Vec<String>>> {
    let mut map: HashMap<i64, Vec<String>> = HashMap::new();
    if post_ids.is_empty() {
        return Ok(map);
    }

    let placeholders = vec!["?"; post_ids.len()].join(", ");
    let sql = format!(
        "SELECT pt.post_id, t.name
         FROM post_tags pt
         JOIN tags t ON t.id = pt.tag_id
         WHERE pt.post_id IN ({placeholders})
         ORDER BY t.name"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(post_ids.iter()), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    for row in rows {
        let (post_id, name) = row?;
        map.entry(post_id).or_default().push(name);
    }

    Ok(map)
}
