use crate::models::MediaType;
use crate::services::folders::{self, FolderError};
use crate::services::library::{self, MoveError};
use crate::web::error::AppResult;
use crate::web::extractors::{ClientFormat, ResponseFormat};
use crate::web::flash;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

fn dashboard_url(folder: Option<i64>) -> String {
    match folder {
        Some(id) => format!("/dashboard/?folder={}", id),
        None => "/dashboard/".to_string(),
    }
}

#[derive(Deserialize)]
pub struct CreateFolderForm {
    name: String,
    parent_id: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CreateFolderForm>,
) -> AppResult<Response> {
    let parent_id = form.parent_id.as_deref().and_then(|s| s.parse().ok());
    let description = form.description.as_deref().unwrap_or("");

    match folders::create_folder(&state.db, &form.name, parent_id, description, None) {
        Ok(folder) => {
            let jar = flash::success(
                jar,
                &format!("Folder \"{}\" created successfully.", folder.name),
            );
            Ok((jar, Redirect::to(&dashboard_url(folder.parent_id))).into_response())
        }
        Err(FolderError::Internal(e)) => Err(e.into()),
        Err(e) => {
            let jar = flash::error(jar, &e.to_string());
            Ok((jar, Redirect::to("/dashboard/")).into_response())
        }
    }
}

#[derive(Deserialize)]
pub struct RenameFolderForm {
    name: String,
}

pub async fn rename(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<RenameFolderForm>,
) -> AppResult<Response> {
    match folders::rename_folder(&state.db, id, &form.name) {
        Ok(folder) => {
            let jar = flash::success(jar, &format!("Folder renamed to \"{}\".", folder.name));
            Ok((jar, Redirect::to(&dashboard_url(Some(folder.id)))).into_response())
        }
        Err(FolderError::Internal(e)) => Err(e.into()),
        Err(FolderError::NotFound) => {
            let jar = flash::error(jar, "Folder not found.");
            Ok((jar, Redirect::to("/dashboard/")).into_response())
        }
        Err(e) => {
            let jar = flash::error(jar, &e.to_string());
            Ok((jar, Redirect::to(&dashboard_url(Some(id)))).into_response())
        }
    }
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match folders::delete_folder(&state.db, id) {
        Ok(folder) => {
            let jar = flash::success(
                jar,
                &format!("Folder \"{}\" deleted successfully.", folder.name),
            );
            Ok((jar, Redirect::to(&dashboard_url(folder.parent_id))).into_response())
        }
        Err(FolderError::Internal(e)) => Err(e.into()),
        Err(FolderError::NotFound) => {
            let jar = flash::error(jar, "Folder not found.");
            Ok((jar, Redirect::to("/dashboard/")).into_response())
        }
        Err(e) => {
            let jar = flash::error(jar, &e.to_string());
            Ok((jar, Redirect::to(&dashboard_url(Some(id)))).into_response())
        }
    }
}

#[derive(Deserialize)]
pub struct MoveFolderForm {
    parent_id: Option<String>,
}

pub async fn move_folder(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<MoveFolderForm>,
) -> AppResult<Response> {
    let parent_id = form
        .parent_id
        .as_deref()
        .filter(|s| !s.is_empty() && *s != "null")
        .and_then(|s| s.parse().ok());

    match folders::move_folder(&state.db, id, parent_id) {
        Ok(folder) => {
            let jar = flash::success(jar, &format!("Folder \"{}\" moved.", folder.name));
            Ok((jar, Redirect::to(&dashboard_url(folder.parent_id))).into_response())
        }
        Err(FolderError::Internal(e)) => Err(e.into()),
        Err(e) => {
            let jar = flash::error(jar, &e.to_string());
            Ok((jar, Redirect::to(&dashboard_url(Some(id)))).into_response())
        }
    }
}

#[derive(Deserialize)]
pub struct MoveMediaForm {
    media_type: String,
    media_id: i64,
    folder_id: Option<String>,
}

/// Move a media record between folders. Programmatic clients get a JSON
/// `{success, message}` body; browsers get a redirect with a flash.
pub async fn move_media(
    State(state): State<Arc<AppState>>,
    ClientFormat(format): ClientFormat,
    jar: CookieJar,
    Form(form): Form<MoveMediaForm>,
) -> AppResult<Response> {
    let media_type = MediaType::parse(&form.media_type);

    // The "null" sentinel (or an empty field) means "move to unfiled".
    let folder_id = form
        .folder_id
        .as_deref()
        .filter(|s| !s.is_empty() && *s != "null")
        .and_then(|s| s.parse().ok());

    match library::move_record(&state.db, media_type, form.media_id, folder_id) {
        Ok(()) => match format {
            ResponseFormat::Json => Ok(Json(
                serde_json::json!({"success": true, "message": "Media moved successfully."}),
            )
            .into_response()),
            ResponseFormat::Html => {
                let jar = flash::success(jar, "Media moved successfully.");
                Ok((jar, Redirect::to(&dashboard_url(folder_id))).into_response())
            }
        },
        Err(MoveError::RecordNotFound) => match format {
            ResponseFormat::Json => Ok(Json(
                serde_json::json!({"success": false, "message": "Media not found."}),
            )
            .into_response()),
            ResponseFormat::Html => {
                let jar = flash::error(jar, "Media not found.");
                Ok((jar, Redirect::to("/dashboard/")).into_response())
            }
        },
        Err(MoveError::Internal(e)) => Err(e.into()),
    }
}
