use crate::Database;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LibraryStats {
    pub total_images: i64,
    pub total_documents: i64,
    pub total_videos: i64,
    pub total_audio: i64,
    pub total_categories: i64,
    pub images_by_category: Vec<CategoryImageCount>,
    pub recent_uploads: RecentUploads,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryImageCount {
    pub name: String,
    pub image_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentUploads {
    pub images: Vec<RecentUpload>,
    pub documents: Vec<RecentUpload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentUpload {
    pub id: i64,
    pub title: String,
    pub created_at: Option<String>,
}

pub fn library_stats(db: &Database) -> Result<LibraryStats> {
    let conn = db.get()?;

    let count = |table: &str| -> Result<i64> {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?)
    };

    let mut stmt = conn.prepare(
        "SELECT c.name, COUNT(ic.image_id) AS image_count
         FROM categories c
         LEFT JOIN image_categories ic ON c.id = ic.category_id
         GROUP BY c.id
         ORDER BY c.name",
    )?;
    let images_by_category = stmt
        .query_map([], |row| {
            Ok(CategoryImageCount {
                name: row.get(0)?,
                image_count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let recent = |table: &str| -> Result<Vec<RecentUpload>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, title, created_at FROM {} ORDER BY created_at DESC LIMIT 5",
            table
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RecentUpload {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    };

    Ok(LibraryStats {
        total_images: count("images")?,
        total_documents: count("documents")?,
        total_videos: count("videos")?,
        total_audio: count("audio")?,
        total_categories: count("categories")?,
        images_by_category,
        recent_uploads: RecentUploads {
            images: recent("images")?,
            documents: recent("documents")?,
        },
    })
}
