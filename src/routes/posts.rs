use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::posts::{Post, PostsPage};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/{post_id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/posts/{post_id}/likes", post(like_post))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    search: Option<String>,
    page_number: Option<i64>,
    page_size: Option<i64>,
}

#[derive(Deserialize)]
struct PostBody {
    title: String,
    text: String,
    #[serde(default)]
    tags: Vec<String>,
}

async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PostsPage>> {
    let page_number = query.page_number.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(state.config.pagination.default_page_size)
        .max(1);

    let (posts, total_count) =
        state
            .posts
            .find_all(query.search.as_deref(), page_number, page_size)?;

    Ok(Json(PostsPage::new(posts, page_number, page_size, total_count)))
}

async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<Json<Post>> {
    let post = state.posts.find_by_id(post_id)?.ok_or(AppError::NotFound)?;
    Ok(Json(post))
}

async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<PostBody>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = state.posts.create(&body.title, &body.text, &body.tags)?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(body): Json<PostBody>,
) -> AppResult<Json<Post>> {
    let post = state
        .posts
        .update(post_id, &body.title, &body.text, &body.tags)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(post))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<StatusCode> {
    if !state.posts.delete(post_id)? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn like_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<Json<Post>> {
    let post = state.posts.add_like(post_id)?.ok_or(AppError::NotFound)?;
    Ok(Json(post))
}
