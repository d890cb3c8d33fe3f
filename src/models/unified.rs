use super::{Category, MediaType, Tag};
use serde::Serialize;
use std::collections::BTreeMap;

/// Normalized projection of one media record for display. Never
/// persisted, recomputed per request.
#[derive(Debug, Clone, Serialize)]
pub struct UnifiedMediaItem {
    pub media_type: MediaType,
    pub id: i64,
    pub title: String,
    pub created_at: Option<String>,
    pub file_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub file_size: u64,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub folder_id: Option<i64>,
    /// Type-specific key/value pairs; empty values are dropped.
    pub metadata: BTreeMap<String, String>,
    pub detail_url: String,
    pub icon: &'static str,
    pub color: &'static str,
}
