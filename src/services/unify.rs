use crate::models::{MediaRecord, MediaType, UnifiedMediaItem};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;

const FALLBACK_ICON: &str = "fa-file";
const FALLBACK_COLOR: &str = "#6c757d";

static TYPE_ICONS: Lazy<HashMap<MediaType, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (MediaType::Image, "fa-image"),
        (MediaType::Document, "fa-file-alt"),
        (MediaType::Video, "fa-video"),
        (MediaType::Audio, "fa-music"),
    ])
});

static TYPE_COLORS: Lazy<HashMap<MediaType, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (MediaType::Image, "#667eea"),
        (MediaType::Document, "#f5576c"),
        (MediaType::Video, "#4facfe"),
        (MediaType::Audio, "#43e97b"),
    ])
});

/// Project one media record into the unified display shape. Pure
/// except for the file-size probe against `media_dir`.
pub fn unify(record: &MediaRecord, media_dir: &Path) -> UnifiedMediaItem {
    let media_type = record.media_type();

    // Images are their own thumbnail; other types only have one if the
    // record carries an explicit thumbnail reference.
    let thumbnail_url = match record {
        MediaRecord::Image(r) => Some(file_url(&r.file_path)),
        _ => record.thumbnail_path().map(file_url),
    };

    let file_url = record.file_path().map(file_url);

    // Unreadable or missing files report a size of zero. Intentional
    // policy: a broken file reference must not break the listing.
    let file_size = record
        .file_path()
        .map(|p| stored_file_size(media_dir, p).unwrap_or(0))
        .unwrap_or(0);

    UnifiedMediaItem {
        media_type,
        id: record.id(),
        title: record.title().to_string(),
        created_at: record.created_at().map(String::from),
        file_url,
        thumbnail_url,
        file_size,
        categories: record.categories().to_vec(),
        tags: record.tags().to_vec(),
        folder_id: record.folder_id(),
        metadata: metadata_for(record),
        detail_url: detail_url(media_type, record.id()),
        icon: TYPE_ICONS.get(&media_type).copied().unwrap_or(FALLBACK_ICON),
        color: TYPE_COLORS
            .get(&media_type)
            .copied()
            .unwrap_or(FALLBACK_COLOR),
    }
}

pub fn detail_url(media_type: MediaType, id: i64) -> String {
    match media_type {
        MediaType::Unknown => "#".to_string(),
        known => format!("/{}/{}/", known, id),
    }
}

pub fn stored_file_size(media_dir: &Path, file_path: &str) -> io::Result<u64> {
    std::fs::metadata(media_dir.join(file_path)).map(|m| m.len())
}

fn file_url(path: &str) -> String {
    format!("/files/{}", path)
}

fn metadata_for(record: &MediaRecord) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    match record {
        MediaRecord::Image(r) => {
            if let (Some(w), Some(h)) = (r.width, r.height) {
                metadata.insert("dimensions".to_string(), format!("{}×{}px", w, h));
            }
            insert_nonempty(&mut metadata, "copyright", r.copyright_holder.as_deref());
        }
        MediaRecord::Document(r) => {
            insert_nonempty(&mut metadata, "version", r.version.as_deref());
            insert_nonempty(&mut metadata, "department", r.department.as_deref());
            insert_nonempty(&mut metadata, "expiry_date", r.expiry_date.as_deref());
        }
        MediaRecord::Video(r) => {
            insert_nonempty(&mut metadata, "duration", r.duration.as_deref());
            insert_nonempty(&mut metadata, "resolution", r.resolution.as_deref());
            insert_nonempty(&mut metadata, "director", r.director.as_deref());
        }
        MediaRecord::Audio(r) => {
            insert_nonempty(&mut metadata, "duration", r.duration.as_deref());
            insert_nonempty(&mut metadata, "artist", r.artist.as_deref());
            insert_nonempty(&mut metadata, "album", r.album.as_deref());
            insert_nonempty(&mut metadata, "genre", r.genre.as_deref());
        }
        MediaRecord::Other(_) => {}
    }

    metadata
}

fn insert_nonempty(map: &mut BTreeMap<String, String>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.is_empty() {
            map.insert(key.to_string(), v.to_string());
        }
    }
}
