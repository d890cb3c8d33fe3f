use crate::services::dashboard::{self, DashboardQuery, SortKey, TypeFilter};
use crate::services::library;
use crate::web::error::AppResult;
use crate::web::flash;
use crate::web::state::AppState;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

pub async fn index() -> Redirect {
    Redirect::to("/dashboard/")
}

#[derive(Deserialize)]
pub struct DashboardParams {
    #[serde(rename = "type")]
    media_type: Option<String>,
    category: Option<String>,
    folder: Option<String>,
    q: Option<String>,
    sort: Option<String>,
    page: Option<usize>,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<DashboardParams>,
) -> AppResult<Response> {
    let (jar, flash_message) = flash::take_flash(jar);

    let query = DashboardQuery {
        media_type: params
            .media_type
            .as_deref()
            .map(TypeFilter::parse)
            .unwrap_or(TypeFilter::All),
        category: params.category.filter(|s| !s.is_empty()),
        folder: params.folder.as_deref().and_then(|s| s.parse().ok()),
        search: params.q.filter(|s| !s.is_empty()),
        sort: params
            .sort
            .as_deref()
            .map(SortKey::parse)
            .unwrap_or(SortKey::CreatedDesc),
        page: params.page.unwrap_or(1),
    };

    let page = dashboard::query(&state.db, &state.media_dir, &query)?;
    let categories = library::list_categories(&state.db)?;

    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx.insert("page", &page);
    ctx.insert("categories", &categories);
    ctx.insert("selected_type", query.media_type.as_str());
    ctx.insert("selected_category", &query.category);
    ctx.insert("search_query", &query.search);
    ctx.insert("sort_by", query.sort.as_str());
    ctx.insert("flash", &flash_message);

    let html = state.templates.render("dashboard.html", &ctx)?;
    Ok((jar, Html(html)).into_response())
}
