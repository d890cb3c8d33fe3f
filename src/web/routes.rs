use super::handlers;
use super::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::dashboard::index))
        .route("/dashboard/", get(handlers::dashboard::dashboard))
        .route("/image/:id/", get(handlers::detail::image_detail))
        .route("/document/:id/", get(handlers::detail::document_detail))
        .route("/video/:id/", get(handlers::detail::video_detail))
        .route("/audio/:id/", get(handlers::detail::audio_detail))
        .route("/folder/create/", post(handlers::folders::create))
        .route("/folder/:id/delete/", post(handlers::folders::delete))
        .route("/folder/:id/rename/", post(handlers::folders::rename))
        .route("/folder/:id/move/", post(handlers::folders::move_folder))
        .route("/media/move/", post(handlers::folders::move_media))
        .route("/api/stats/", get(handlers::api::library_stats))
        .route("/files/:filename", get(handlers::files::serve))
}
