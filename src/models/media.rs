use super::{Category, Tag};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Document,
    Video,
    Audio,
    Unknown,
}

impl MediaType {
    /// Unrecognized tags map to `Unknown` rather than failing.
    pub fn parse(s: &str) -> MediaType {
        match s {
            "image" => MediaType::Image,
            "document" => MediaType::Document,
            "video" => MediaType::Video,
            "audio" => MediaType::Audio,
            _ => MediaType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Document => "document",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub copyright_holder: Option<String>,
    pub folder_id: Option<i64>,
    pub created_at: Option<String>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub version: Option<String>,
    pub department: Option<String>,
    pub expiry_date: Option<String>,
    pub folder_id: Option<i64>,
    pub created_at: Option<String>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoRecord {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub duration: Option<String>,
    pub resolution: Option<String>,
    pub director: Option<String>,
    pub folder_id: Option<i64>,
    pub created_at: Option<String>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AudioRecord {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    pub duration: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub folder_id: Option<i64>,
    pub created_at: Option<String>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

/// Shared-field fallback for records of a shape this version does not
/// know about. Projects as `unknown` instead of failing.
#[derive(Debug, Clone, Serialize)]
pub struct GenericRecord {
    pub id: i64,
    pub title: String,
    pub file_path: Option<String>,
    pub folder_id: Option<i64>,
    pub created_at: Option<String>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

/// Closed union over the four media sources plus the unknown fallback.
#[derive(Debug, Clone, Serialize)]
pub enum MediaRecord {
    Image(ImageRecord),
    Document(DocumentRecord),
    Video(VideoRecord),
    Audio(AudioRecord),
    Other(GenericRecord),
}

impl MediaRecord {
    pub fn media_type(&self) -> MediaType {
        match self {
            MediaRecord::Image(_) => MediaType::Image,
            MediaRecord::Document(_) => MediaType::Document,
            MediaRecord::Video(_) => MediaType::Video,
            MediaRecord::Audio(_) => MediaType::Audio,
            MediaRecord::Other(_) => MediaType::Unknown,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            MediaRecord::Image(r) => r.id,
            MediaRecord::Document(r) => r.id,
            MediaRecord::Video(r) => r.id,
            MediaRecord::Audio(r) => r.id,
            MediaRecord::Other(r) => r.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MediaRecord::Image(r) => &r.title,
            MediaRecord::Document(r) => &r.title,
            MediaRecord::Video(r) => &r.title,
            MediaRecord::Audio(r) => &r.title,
            MediaRecord::Other(r) => &r.title,
        }
    }

    pub fn created_at(&self) -> Option<&str> {
        match self {
            MediaRecord::Image(r) => r.created_at.as_deref(),
            MediaRecord::Document(r) => r.created_at.as_deref(),
            MediaRecord::Video(r) => r.created_at.as_deref(),
            MediaRecord::Audio(r) => r.created_at.as_deref(),
            MediaRecord::Other(r) => r.created_at.as_deref(),
        }
    }

    pub fn file_path(&self) -> Option<&str> {
        match self {
            MediaRecord::Image(r) => Some(&r.file_path),
            MediaRecord::Document(r) => Some(&r.file_path),
            MediaRecord::Video(r) => Some(&r.file_path),
            MediaRecord::Audio(r) => Some(&r.file_path),
            MediaRecord::Other(r) => r.file_path.as_deref(),
        }
    }

    pub fn thumbnail_path(&self) -> Option<&str> {
        match self {
            MediaRecord::Video(r) => r.thumbnail_path.as_deref(),
            MediaRecord::Audio(r) => r.thumbnail_path.as_deref(),
            _ => None,
        }
    }

    pub fn folder_id(&self) -> Option<i64> {
        match self {
            MediaRecord::Image(r) => r.folder_id,
            MediaRecord::Document(r) => r.folder_id,
            MediaRecord::Video(r) => r.folder_id,
            MediaRecord::Audio(r) => r.folder_id,
            MediaRecord::Other(r) => r.folder_id,
        }
    }

    pub fn categories(&self) -> &[Category] {
        match self {
            MediaRecord::Image(r) => &r.categories,
            MediaRecord::Document(_) => &[],
            MediaRecord::Video(r) => &r.categories,
            MediaRecord::Audio(r) => &r.categories,
            MediaRecord::Other(r) => &r.categories,
        }
    }

    pub fn tags(&self) -> &[Tag] {
        match self {
            MediaRecord::Image(r) => &r.tags,
            MediaRecord::Document(r) => &r.tags,
            MediaRecord::Video(r) => &r.tags,
            MediaRecord::Audio(r) => &r.tags,
            MediaRecord::Other(r) => &r.tags,
        }
    }
}
