use crate::models::MediaType;
use crate::services::{folders, library};
use crate::{Config, Database};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Register an existing file in the library. This is a thin stand-in
/// for the upload pipeline: it copies the file into the media dir,
/// classifies it and inserts the matching source row. No thumbnailing
/// or renditions.
pub async fn run(
    config_path: &Path,
    file: PathBuf,
    title: Option<String>,
    folder: Option<i64>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;
    db.migrate()?;

    let data = std::fs::read(&file)?;
    let media_type = classify(&file, &data)?;

    let folder_id = match folder {
        Some(id) => {
            let resolved = folders::get_folder(&db, id)?;
            if resolved.is_none() {
                tracing::warn!("Folder {} not found; importing as unfiled", id);
            }
            resolved.map(|f| f.id)
        }
        None => None,
    };

    let title = title.unwrap_or_else(|| {
        file.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string()
    });

    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let filename = if extension.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", Uuid::new_v4(), extension)
    };

    let upload_dir = PathBuf::from(&config.media.upload_dir);
    std::fs::create_dir_all(&upload_dir)?;
    std::fs::write(upload_dir.join(&filename), &data)?;

    let id = match media_type {
        MediaType::Image => {
            let dimensions = image::image_dimensions(&file).ok();
            library::create_image(
                &db,
                &library::NewImage {
                    title: &title,
                    file_path: &filename,
                    width: dimensions.map(|(w, _)| w as i64),
                    height: dimensions.map(|(_, h)| h as i64),
                    copyright_holder: None,
                    folder_id,
                },
            )?
        }
        MediaType::Document => library::create_document(
            &db,
            &library::NewDocument {
                title: &title,
                file_path: &filename,
                version: None,
                department: None,
                expiry_date: None,
                folder_id,
            },
        )?,
        MediaType::Video => library::create_video(
            &db,
            &library::NewVideo {
                title: &title,
                file_path: &filename,
                thumbnail_path: None,
                duration: None,
                resolution: None,
                director: None,
                folder_id,
            },
        )?,
        MediaType::Audio => library::create_audio(
            &db,
            &library::NewAudio {
                title: &title,
                file_path: &filename,
                thumbnail_path: None,
                duration: None,
                artist: None,
                album: None,
                genre: None,
                folder_id,
            },
        )?,
        MediaType::Unknown => bail!("Could not classify {:?}", file),
    };

    tracing::info!("Imported {:?} as {} {}", file, media_type, id);
    Ok(())
}

/// Classify by content first, file extension second.
fn classify(path: &Path, data: &[u8]) -> Result<MediaType> {
    if let Some(kind) = infer::get(data) {
        let media_type = match kind.matcher_type() {
            infer::MatcherType::Image => MediaType::Image,
            infer::MatcherType::Video => MediaType::Video,
            infer::MatcherType::Audio => MediaType::Audio,
            infer::MatcherType::Doc
            | infer::MatcherType::Archive
            | infer::MatcherType::Book
            | infer::MatcherType::Text => MediaType::Document,
            _ => MediaType::Unknown,
        };
        if media_type != MediaType::Unknown {
            return Ok(media_type);
        }
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(match mime.type_().as_str() {
        "image" => MediaType::Image,
        "video" => MediaType::Video,
        "audio" => MediaType::Audio,
        _ => MediaType::Document,
    })
}
