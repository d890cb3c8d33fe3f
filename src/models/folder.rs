use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub sort_order: i64,
    pub parent_id: Option<i64>,
    /// Pre-seeded folders are protected from deletion.
    pub is_system: bool,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
}
