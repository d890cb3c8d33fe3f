use crate::models::MediaRecord;
use crate::services::{library, unify};
use crate::web::error::AppResult;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;
use tera::Context;

fn not_found(state: &AppState) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    let html = state.templates.render("404.html", &ctx)?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

pub async fn image_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let Some(record) = library::get_image(&state.db, id)? else {
        return not_found(&state);
    };
    let item = unify::unify(&MediaRecord::Image(record.clone()), &state.media_dir);

    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx.insert("image", &record);
    ctx.insert("item", &item);

    let html = state.templates.render("image_detail.html", &ctx)?;
    Ok(Html(html).into_response())
}

pub async fn document_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let Some(record) = library::get_document(&state.db, id)? else {
        return not_found(&state);
    };
    let item = unify::unify(&MediaRecord::Document(record.clone()), &state.media_dir);

    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx.insert("document", &record);
    ctx.insert("item", &item);

    let html = state.templates.render("document_detail.html", &ctx)?;
    Ok(Html(html).into_response())
}

pub async fn video_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let Some(record) = library::get_video(&state.db, id)? else {
        return not_found(&state);
    };
    let item = unify::unify(&MediaRecord::Video(record.clone()), &state.media_dir);

    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx.insert("video", &record);
    ctx.insert("item", &item);

    let html = state.templates.render("video_detail.html", &ctx)?;
    Ok(Html(html).into_response())
}

pub async fn audio_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let Some(record) = library::get_audio(&state.db, id)? else {
        return not_found(&state);
    };
    let item = unify::unify(&MediaRecord::Audio(record.clone()), &state.media_dir);

    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx.insert("audio", &record);
    ctx.insert("item", &item);

    let html = state.templates.render("audio_detail.html", &ctx)?;
    Ok(Html(html).into_response())
}
