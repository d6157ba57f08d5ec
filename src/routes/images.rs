use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/posts/{post_id}/image",
        get(download_image).put(upload_image),
    )
}

async fn upload_image(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_owned)
            .ok_or_else(|| AppError::BadRequest("Missing content type".to_string()))?;
        let filename = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        state
            .images
            .put(post_id, &content_type, filename.as_deref(), &bytes)?;
        return Ok(StatusCode::NO_CONTENT);
    }

    Err(AppError::BadRequest("File is empty".to_string()))
}

async fn download_image(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let (filename, bytes) = state.images.get(post_id)?.ok_or(AppError::NotFound)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
