use crate::models::{Folder, MediaRecord, MediaType, UnifiedMediaItem};
use crate::services::library::{self, FolderScope, SourceFilter};
use crate::services::{folders, unify};
use crate::Database;
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::Path;

pub const PAGE_SIZE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Only(MediaType),
}

impl TypeFilter {
    /// `all` and anything unrecognized both mean "no type filter".
    pub fn parse(s: &str) -> TypeFilter {
        match MediaType::parse(s) {
            MediaType::Unknown => TypeFilter::All,
            t => TypeFilter::Only(t),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(t) => t.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedDesc,
    CreatedAsc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub fn parse(s: &str) -> SortKey {
        match s {
            "created_at" => SortKey::CreatedAsc,
            "title" => SortKey::TitleAsc,
            "-title" => SortKey::TitleDesc,
            _ => SortKey::CreatedDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CreatedDesc => "-created_at",
            SortKey::CreatedAsc => "created_at",
            SortKey::TitleAsc => "title",
            SortKey::TitleDesc => "-title",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardQuery {
    pub media_type: TypeFilter,
    pub category: Option<String>,
    pub folder: Option<i64>,
    pub search: Option<String>,
    pub sort: SortKey,
    pub page: usize,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            media_type: TypeFilter::All,
            category: None,
            folder: None,
            search: None,
            sort: SortKey::CreatedDesc,
            page: 1,
        }
    }
}

/// Per-type counts over the current folder/search/category scope. The
/// type filter is deliberately excluded so every tab count can be shown
/// at once; `total` alone reflects it.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub images: usize,
    pub documents: usize,
    pub videos: usize,
    pub audio: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderContext {
    pub current: Option<Folder>,
    pub breadcrumbs: Vec<Folder>,
    pub subfolders: Vec<Folder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub items: Vec<UnifiedMediaItem>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub stats: DashboardStats,
    pub folder: FolderContext,
}

/// Run one dashboard query: resolve the folder context, filter each
/// source, merge, sort, project and paginate. No filter combination
/// errors; lookups that miss degrade to empty results.
pub fn query(db: &Database, media_dir: &Path, q: &DashboardQuery) -> Result<DashboardPage> {
    // A folder id that does not resolve degrades to the root context.
    let current = match q.folder {
        Some(id) => folders::get_folder(db, id)?,
        None => None,
    };

    let (breadcrumbs, subfolders, scope) = match &current {
        Some(folder) => (
            folders::breadcrumbs(db, folder)?,
            folders::list_children(db, Some(folder.id))?,
            FolderScope::In(folder.id),
        ),
        None => (
            Vec::new(),
            folders::list_children(db, None)?,
            FolderScope::Unfiled,
        ),
    };

    let filter = SourceFilter {
        folder: scope,
        category: q.category.as_deref(),
        search: q.search.as_deref(),
    };

    let images = library::list_images(db, &filter)?;
    let documents = library::list_documents(db, &filter)?;
    let videos = library::list_videos(db, &filter)?;
    let audio = library::list_audio(db, &filter)?;

    let mut stats = DashboardStats {
        total: 0,
        images: images.len(),
        documents: documents.len(),
        videos: videos.len(),
        audio: audio.len(),
    };

    let mut merged: Vec<MediaRecord> = Vec::new();
    match q.media_type {
        TypeFilter::All => {
            merged.extend(images.into_iter().map(MediaRecord::Image));
            merged.extend(documents.into_iter().map(MediaRecord::Document));
            merged.extend(videos.into_iter().map(MediaRecord::Video));
            merged.extend(audio.into_iter().map(MediaRecord::Audio));
        }
        TypeFilter::Only(MediaType::Image) => {
            merged.extend(images.into_iter().map(MediaRecord::Image));
        }
        TypeFilter::Only(MediaType::Document) => {
            merged.extend(documents.into_iter().map(MediaRecord::Document));
        }
        TypeFilter::Only(MediaType::Video) => {
            merged.extend(videos.into_iter().map(MediaRecord::Video));
        }
        TypeFilter::Only(MediaType::Audio) => {
            merged.extend(audio.into_iter().map(MediaRecord::Audio));
        }
        TypeFilter::Only(MediaType::Unknown) => {}
    }

    sort_records(&mut merged, q.sort);

    let items: Vec<UnifiedMediaItem> = merged.iter().map(|r| unify::unify(r, media_dir)).collect();
    stats.total = items.len();

    let total_items = items.len();
    let total_pages = total_items.div_ceil(PAGE_SIZE).max(1);
    // Out-of-range pages clamp to the last valid page.
    let page = q.page.max(1).min(total_pages);

    let start = (page - 1) * PAGE_SIZE;
    let items: Vec<UnifiedMediaItem> = items
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .collect();

    Ok(DashboardPage {
        items,
        page,
        total_pages,
        total_items,
        has_prev: page > 1,
        has_next: page < total_pages,
        stats,
        folder: FolderContext {
            current,
            breadcrumbs,
            subfolders,
        },
    })
}

pub fn sort_records(records: &mut [MediaRecord], sort: SortKey) {
    match sort {
        SortKey::CreatedDesc => {
            records.sort_by(|a, b| {
                sort_timestamp(b.created_at()).cmp(&sort_timestamp(a.created_at()))
            });
        }
        SortKey::CreatedAsc => {
            records.sort_by(|a, b| {
                sort_timestamp(a.created_at()).cmp(&sort_timestamp(b.created_at()))
            });
        }
        SortKey::TitleAsc => {
            records.sort_by(|a, b| a.title().to_lowercase().cmp(&b.title().to_lowercase()));
        }
        SortKey::TitleDesc => {
            records.sort_by(|a, b| b.title().to_lowercase().cmp(&a.title().to_lowercase()));
        }
    }
}

/// Missing or unparseable timestamps sort as the earliest possible
/// value.
fn sort_timestamp(raw: Option<&str>) -> NaiveDateTime {
    raw.and_then(parse_timestamp).unwrap_or(NaiveDateTime::MIN)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}
