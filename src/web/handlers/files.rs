use crate::web::error::AppResult;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

pub async fn serve(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    // Prevent path traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let file_path = state.media_dir.join(&filename);

    let canonical_media = state.media_dir.canonicalize().unwrap_or_default();
    let canonical_file = match file_path.canonicalize() {
        Ok(p) => p,
        Err(_) => return Ok(StatusCode::NOT_FOUND.into_response()),
    };

    if !canonical_file.starts_with(&canonical_media) {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let content = tokio::fs::read(&file_path).await?;
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.as_ref())], content).into_response())
}
