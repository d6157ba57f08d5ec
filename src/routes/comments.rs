use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::comments::Comment;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/posts/{post_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/api/posts/{post_id}/comments/{comment_id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}

#[derive(Deserialize)]
struct CommentBody {
    text: String,
}

async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<Json<Vec<Comment>>> {
    Ok(Json(state.comments.find_all_by_post_id(post_id)?))
}

async fn get_comment(
    State(state): State<AppState>,
    Path((_post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Json<Comment>> {
    let comment = state
        .comments
        .find_by_id(comment_id)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(comment))
}

async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(body): Json<CommentBody>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .comments
        .create(post_id, &body.text)?
        .ok_or(AppError::NotFound)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn update_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Json(body): Json<CommentBody>,
) -> AppResult<Json<Comment>> {
    let comment = state
        .comments
        .update(comment_id, post_id, &body.text)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(comment))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    if !state.comments.delete(comment_id, post_id)? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
