use crate::services::stats;
use crate::web::error::AppResult;
use crate::web::state::AppState;
use axum::extract::State;
use axum::response::Json;
use std::sync::Arc;

/// GET /api/stats/
pub async fn library_stats(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<stats::LibraryStats>> {
    let stats = stats::library_stats(&state.db)?;
    Ok(Json(stats))
}
