use crate::models::{
    AudioRecord, Category, DocumentRecord, ImageRecord, MediaRecord, MediaType, Tag, VideoRecord,
};
use crate::Database;
use anyhow::{bail, Result};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, ToSql};
use std::collections::HashMap;

/// Folder scope applied to every source query: an exact folder, or the
/// root view which shows only unfiled records.
#[derive(Debug, Clone, Copy)]
pub enum FolderScope {
    Unfiled,
    In(i64),
}

#[derive(Debug, Clone, Copy)]
pub struct SourceFilter<'a> {
    pub folder: FolderScope,
    pub category: Option<&'a str>,
    pub search: Option<&'a str>,
}

#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("Media not found.")]
    RecordNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

struct SourceSpec {
    table: &'static str,
    columns: &'static str,
    tag_join: &'static str,
    tag_fk: &'static str,
    category_join: Option<(&'static str, &'static str)>,
}

const IMAGE_SPEC: SourceSpec = SourceSpec {
    table: "images",
    columns: "m.id, m.title, m.file_path, m.width, m.height, m.copyright_holder, m.folder_id, m.created_at",
    tag_join: "image_tags",
    tag_fk: "image_id",
    category_join: Some(("image_categories", "image_id")),
};

const DOCUMENT_SPEC: SourceSpec = SourceSpec {
    table: "documents",
    columns: "m.id, m.title, m.file_path, m.version, m.department, m.expiry_date, m.folder_id, m.created_at",
    tag_join: "document_tags",
    tag_fk: "document_id",
    // Documents have no category support; the category filter leaves
    // this source untouched.
    category_join: None,
};

const VIDEO_SPEC: SourceSpec = SourceSpec {
    table: "videos",
    columns: "m.id, m.title, m.file_path, m.thumbnail_path, m.duration, m.resolution, m.director, m.folder_id, m.created_at",
    tag_join: "video_tags",
    tag_fk: "video_id",
    category_join: Some(("video_categories", "video_id")),
};

const AUDIO_SPEC: SourceSpec = SourceSpec {
    table: "audio",
    columns: "m.id, m.title, m.file_path, m.thumbnail_path, m.duration, m.artist, m.album, m.genre, m.folder_id, m.created_at",
    tag_join: "audio_tags",
    tag_fk: "audio_id",
    category_join: Some(("audio_categories", "audio_id")),
};

/// Build one source query. DISTINCT because the tag join can multiply
/// rows when several tags match the search term.
fn build_query(spec: &SourceSpec, filter: &SourceFilter) -> (String, Vec<Value>) {
    let mut sql = format!("SELECT DISTINCT {} FROM {} m", spec.columns, spec.table);
    let mut params: Vec<Value> = Vec::new();

    if filter.search.is_some() {
        sql.push_str(&format!(
            " LEFT JOIN {} jt ON jt.{} = m.id LEFT JOIN tags t ON t.id = jt.tag_id",
            spec.tag_join, spec.tag_fk
        ));
    }

    let category = filter.category.and_then(|slug| {
        spec.category_join
            .map(|(join_table, fk)| (slug, join_table, fk))
    });
    if let Some((_, join_table, fk)) = category {
        sql.push_str(&format!(
            " JOIN {} jc ON jc.{} = m.id JOIN categories c ON c.id = jc.category_id",
            join_table, fk
        ));
    }

    match filter.folder {
        FolderScope::Unfiled => sql.push_str(" WHERE m.folder_id IS NULL"),
        FolderScope::In(id) => {
            sql.push_str(" WHERE m.folder_id = ?");
            params.push(Value::Integer(id));
        }
    }

    if let Some((slug, _, _)) = category {
        sql.push_str(" AND c.slug = ?");
        params.push(Value::Text(slug.to_string()));
    }

    if let Some(q) = filter.search {
        let pattern = format!("%{}%", q);
        sql.push_str(" AND (m.title LIKE ? OR t.name LIKE ?)");
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
    }

    sql.push_str(" ORDER BY m.id");
    (sql, params)
}

type LabelRows = HashMap<i64, Vec<(i64, String, String)>>;

fn label_map(
    conn: &Connection,
    label_table: &str,
    join_table: &str,
    owner_col: &str,
    label_col: &str,
    ids: &[i64],
) -> Result<LabelRows> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders: String = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!(
        "SELECT jt.{owner}, l.id, l.name, l.slug
         FROM {label} l
         JOIN {join} jt ON l.id = jt.{col}
         WHERE jt.{owner} IN ({placeholders})
         ORDER BY l.name",
        owner = owner_col,
        label = label_table,
        join = join_table,
        col = label_col,
        placeholders = placeholders,
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();

    let mut map: LabelRows = HashMap::new();
    let rows = stmt.query_map(params.as_slice(), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;
    for row in rows {
        let (owner, id, name, slug) = row?;
        map.entry(owner).or_default().push((id, name, slug));
    }
    Ok(map)
}

fn take_categories(map: &mut LabelRows, id: i64) -> Vec<Category> {
    map.remove(&id)
        .unwrap_or_default()
        .into_iter()
        .map(|(id, name, slug)| Category { id, name, slug })
        .collect()
}

fn take_tags(map: &mut LabelRows, id: i64) -> Vec<Tag> {
    map.remove(&id)
        .unwrap_or_default()
        .into_iter()
        .map(|(id, name, slug)| Tag { id, name, slug })
        .collect()
}

pub fn list_images(db: &Database, filter: &SourceFilter) -> Result<Vec<ImageRecord>> {
    let conn = db.get()?;
    let (sql, params) = build_query(&IMAGE_SPEC, filter);
    let mut stmt = conn.prepare(&sql)?;
    let mut records = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(ImageRecord {
                id: row.get(0)?,
                title: row.get(1)?,
                file_path: row.get(2)?,
                width: row.get(3)?,
                height: row.get(4)?,
                copyright_holder: row.get(5)?,
                folder_id: row.get(6)?,
                created_at: row.get(7)?,
                categories: Vec::new(),
                tags: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let mut cats = label_map(&conn, "categories", "image_categories", "image_id", "category_id", &ids)?;
    let mut tags = label_map(&conn, "tags", "image_tags", "image_id", "tag_id", &ids)?;
    for record in &mut records {
        record.categories = take_categories(&mut cats, record.id);
        record.tags = take_tags(&mut tags, record.id);
    }
    Ok(records)
}

pub fn list_documents(db: &Database, filter: &SourceFilter) -> Result<Vec<DocumentRecord>> {
    let conn = db.get()?;
    let (sql, params) = build_query(&DOCUMENT_SPEC, filter);
    let mut stmt = conn.prepare(&sql)?;
    let mut records = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(DocumentRecord {
                id: row.get(0)?,
                title: row.get(1)?,
                file_path: row.get(2)?,
                version: row.get(3)?,
                department: row.get(4)?,
                expiry_date: row.get(5)?,
                folder_id: row.get(6)?,
                created_at: row.get(7)?,
                tags: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let mut tags = label_map(&conn, "tags", "document_tags", "document_id", "tag_id", &ids)?;
    for record in &mut records {
        record.tags = take_tags(&mut tags, record.id);
    }
    Ok(records)
}

pub fn list_videos(db: &Database, filter: &SourceFilter) -> Result<Vec<VideoRecord>> {
    let conn = db.get()?;
    let (sql, params) = build_query(&VIDEO_SPEC, filter);
    let mut stmt = conn.prepare(&sql)?;
    let mut records = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(VideoRecord {
                id: row.get(0)?,
                title: row.get(1)?,
                file_path: row.get(2)?,
                thumbnail_path: row.get(3)?,
                duration: row.get(4)?,
                resolution: row.get(5)?,
                director: row.get(6)?,
                folder_id: row.get(7)?,
                created_at: row.get(8)?,
                categories: Vec::new(),
                tags: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let mut cats = label_map(&conn, "categories", "video_categories", "video_id", "category_id", &ids)?;
    let mut tags = label_map(&conn, "tags", "video_tags", "video_id", "tag_id", &ids)?;
    for record in &mut records {
        record.categories = take_categories(&mut cats, record.id);
        record.tags = take_tags(&mut tags, record.id);
    }
    Ok(records)
}

pub fn list_audio(db: &Database, filter: &SourceFilter) -> Result<Vec<AudioRecord>> {
    let conn = db.get()?;
    let (sql, params) = build_query(&AUDIO_SPEC, filter);
    let mut stmt = conn.prepare(&sql)?;
    let mut records = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(AudioRecord {
                id: row.get(0)?,
                title: row.get(1)?,
                file_path: row.get(2)?,
                thumbnail_path: row.get(3)?,
                duration: row.get(4)?,
                artist: row.get(5)?,
                album: row.get(6)?,
                genre: row.get(7)?,
                folder_id: row.get(8)?,
                created_at: row.get(9)?,
                categories: Vec::new(),
                tags: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let mut cats = label_map(&conn, "categories", "audio_categories", "audio_id", "category_id", &ids)?;
    let mut tags = label_map(&conn, "tags", "audio_tags", "audio_id", "tag_id", &ids)?;
    for record in &mut records {
        record.categories = take_categories(&mut cats, record.id);
        record.tags = take_tags(&mut tags, record.id);
    }
    Ok(records)
}

pub fn get_image(db: &Database, id: i64) -> Result<Option<ImageRecord>> {
    let conn = db.get()?;
    let record = conn
        .query_row(
            "SELECT id, title, file_path, width, height, copyright_holder, folder_id, created_at
             FROM images WHERE id = ?",
            [id],
            |row| {
                Ok(ImageRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    file_path: row.get(2)?,
                    width: row.get(3)?,
                    height: row.get(4)?,
                    copyright_holder: row.get(5)?,
                    folder_id: row.get(6)?,
                    created_at: row.get(7)?,
                    categories: Vec::new(),
                    tags: Vec::new(),
                })
            },
        )
        .optional()?;

    match record {
        Some(mut r) => {
            let ids = [r.id];
            let mut cats =
                label_map(&conn, "categories", "image_categories", "image_id", "category_id", &ids)?;
            let mut tags = label_map(&conn, "tags", "image_tags", "image_id", "tag_id", &ids)?;
            r.categories = take_categories(&mut cats, r.id);
            r.tags = take_tags(&mut tags, r.id);
            Ok(Some(r))
        }
        None => Ok(None),
    }
}

pub fn get_document(db: &Database, id: i64) -> Result<Option<DocumentRecord>> {
    let conn = db.get()?;
    let record = conn
        .query_row(
            "SELECT id, title, file_path, version, department, expiry_date, folder_id, created_at
             FROM documents WHERE id = ?",
            [id],
            |row| {
                Ok(DocumentRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    file_path: row.get(2)?,
                    version: row.get(3)?,
                    department: row.get(4)?,
                    expiry_date: row.get(5)?,
                    folder_id: row.get(6)?,
                    created_at: row.get(7)?,
                    tags: Vec::new(),
                })
            },
        )
        .optional()?;

    match record {
        Some(mut r) => {
            let ids = [r.id];
            let mut tags = label_map(&conn, "tags", "document_tags", "document_id", "tag_id", &ids)?;
            r.tags = take_tags(&mut tags, r.id);
            Ok(Some(r))
        }
        None => Ok(None),
    }
}

pub fn get_video(db: &Database, id: i64) -> Result<Option<VideoRecord>> {
    let conn = db.get()?;
    let record = conn
        .query_row(
            "SELECT id, title, file_path, thumbnail_path, duration, resolution, director, folder_id, created_at
             FROM videos WHERE id = ?",
            [id],
            |row| {
                Ok(VideoRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    file_path: row.get(2)?,
                    thumbnail_path: row.get(3)?,
                    duration: row.get(4)?,
                    resolution: row.get(5)?,
                    director: row.get(6)?,
                    folder_id: row.get(7)?,
                    created_at: row.get(8)?,
                    categories: Vec::new(),
                    tags: Vec::new(),
                })
            },
        )
        .optional()?;

    match record {
        Some(mut r) => {
            let ids = [r.id];
            let mut cats =
                label_map(&conn, "categories", "video_categories", "video_id", "category_id", &ids)?;
            let mut tags = label_map(&conn, "tags", "video_tags", "video_id", "tag_id", &ids)?;
            r.categories = take_categories(&mut cats, r.id);
            r.tags = take_tags(&mut tags, r.id);
            Ok(Some(r))
        }
        None => Ok(None),
    }
}

pub fn get_audio(db: &Database, id: i64) -> Result<Option<AudioRecord>> {
    let conn = db.get()?;
    let record = conn
        .query_row(
            "SELECT id, title, file_path, thumbnail_path, duration, artist, album, genre, folder_id, created_at
             FROM audio WHERE id = ?",
            [id],
            |row| {
                Ok(AudioRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    file_path: row.get(2)?,
                    thumbnail_path: row.get(3)?,
                    duration: row.get(4)?,
                    artist: row.get(5)?,
                    album: row.get(6)?,
                    genre: row.get(7)?,
                    folder_id: row.get(8)?,
                    created_at: row.get(9)?,
                    categories: Vec::new(),
                    tags: Vec::new(),
                })
            },
        )
        .optional()?;

    match record {
        Some(mut r) => {
            let ids = [r.id];
            let mut cats =
                label_map(&conn, "categories", "audio_categories", "audio_id", "category_id", &ids)?;
            let mut tags = label_map(&conn, "tags", "audio_tags", "audio_id", "tag_id", &ids)?;
            r.categories = take_categories(&mut cats, r.id);
            r.tags = take_tags(&mut tags, r.id);
            Ok(Some(r))
        }
        None => Ok(None),
    }
}

pub fn get_record(db: &Database, media_type: MediaType, id: i64) -> Result<Option<MediaRecord>> {
    Ok(match media_type {
        MediaType::Image => get_image(db, id)?.map(MediaRecord::Image),
        MediaType::Document => get_document(db, id)?.map(MediaRecord::Document),
        MediaType::Video => get_video(db, id)?.map(MediaRecord::Video),
        MediaType::Audio => get_audio(db, id)?.map(MediaRecord::Audio),
        MediaType::Unknown => None,
    })
}

/// Reassign a record's folder, or clear it when `folder_id` is `None`.
/// Lookup and update run in one transaction. A folder id that does not
/// resolve degrades to the root (unfiled) assignment.
pub fn move_record(
    db: &Database,
    media_type: MediaType,
    media_id: i64,
    folder_id: Option<i64>,
) -> Result<(), MoveError> {
    let table = match media_type {
        MediaType::Image => "images",
        MediaType::Document => "documents",
        MediaType::Video => "videos",
        MediaType::Audio => "audio",
        MediaType::Unknown => return Err(MoveError::RecordNotFound),
    };

    let mut conn = db.get()?;
    let tx = conn.transaction().map_err(anyhow::Error::from)?;

    let exists: Option<i64> = tx
        .query_row(
            &format!("SELECT id FROM {} WHERE id = ?", table),
            [media_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)?;
    if exists.is_none() {
        return Err(MoveError::RecordNotFound);
    }

    let folder_id = match folder_id {
        Some(fid) => tx
            .query_row("SELECT id FROM folders WHERE id = ?", [fid], |row| {
                row.get::<_, i64>(0)
            })
            .optional()
            .map_err(anyhow::Error::from)?,
        None => None,
    };

    tx.execute(
        &format!("UPDATE {} SET folder_id = ? WHERE id = ?", table),
        (folder_id, media_id),
    )
    .map_err(anyhow::Error::from)?;
    tx.commit().map_err(anyhow::Error::from)?;

    tracing::info!("Moved {} {} to folder {:?}", media_type, media_id, folder_id);
    Ok(())
}

pub struct NewImage<'a> {
    pub title: &'a str,
    pub file_path: &'a str,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub copyright_holder: Option<&'a str>,
    pub folder_id: Option<i64>,
}

pub struct NewDocument<'a> {
    pub title: &'a str,
    pub file_path: &'a str,
    pub version: Option<&'a str>,
    pub department: Option<&'a str>,
    pub expiry_date: Option<&'a str>,
    pub folder_id: Option<i64>,
}

pub struct NewVideo<'a> {
    pub title: &'a str,
    pub file_path: &'a str,
    pub thumbnail_path: Option<&'a str>,
    pub duration: Option<&'a str>,
    pub resolution: Option<&'a str>,
    pub director: Option<&'a str>,
    pub folder_id: Option<i64>,
}

pub struct NewAudio<'a> {
    pub title: &'a str,
    pub file_path: &'a str,
    pub thumbnail_path: Option<&'a str>,
    pub duration: Option<&'a str>,
    pub artist: Option<&'a str>,
    pub album: Option<&'a str>,
    pub genre: Option<&'a str>,
    pub folder_id: Option<i64>,
}

pub fn create_image(db: &Database, input: &NewImage) -> Result<i64> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO images (title, file_path, width, height, copyright_holder, folder_id)
         VALUES (?, ?, ?, ?, ?, ?)",
        (
            input.title,
            input.file_path,
            input.width,
            input.height,
            input.copyright_holder,
            input.folder_id,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_document(db: &Database, input: &NewDocument) -> Result<i64> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO documents (title, file_path, version, department, expiry_date, folder_id)
         VALUES (?, ?, ?, ?, ?, ?)",
        (
            input.title,
            input.file_path,
            input.version,
            input.department,
            input.expiry_date,
            input.folder_id,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_video(db: &Database, input: &NewVideo) -> Result<i64> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO videos (title, file_path, thumbnail_path, duration, resolution, director, folder_id)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        (
            input.title,
            input.file_path,
            input.thumbnail_path,
            input.duration,
            input.resolution,
            input.director,
            input.folder_id,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_audio(db: &Database, input: &NewAudio) -> Result<i64> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO audio (title, file_path, thumbnail_path, duration, artist, album, genre, folder_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        (
            input.title,
            input.file_path,
            input.thumbnail_path,
            input.duration,
            input.artist,
            input.album,
            input.genre,
            input.folder_id,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_category(db: &Database, name: &str) -> Result<i64> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO categories (name, slug) VALUES (?, ?)",
        (name, crate::services::slug::generate_slug(name)),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_tag(db: &Database, name: &str) -> Result<i64> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO tags (name, slug) VALUES (?, ?)",
        (name, crate::services::slug::generate_slug(name)),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_categories(db: &Database) -> Result<Vec<Category>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare("SELECT id, name, slug FROM categories ORDER BY name")?;
    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                slug: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn assign_category(
    db: &Database,
    media_type: MediaType,
    record_id: i64,
    category_id: i64,
) -> Result<()> {
    let (table, fk) = match media_type {
        MediaType::Image => ("image_categories", "image_id"),
        MediaType::Video => ("video_categories", "video_id"),
        MediaType::Audio => ("audio_categories", "audio_id"),
        MediaType::Document => bail!("documents do not support categories"),
        MediaType::Unknown => bail!("unknown media type"),
    };
    let conn = db.get()?;
    conn.execute(
        &format!(
            "INSERT OR IGNORE INTO {} ({}, category_id) VALUES (?, ?)",
            table, fk
        ),
        (record_id, category_id),
    )?;
    Ok(())
}

pub fn assign_tag(db: &Database, media_type: MediaType, record_id: i64, tag_id: i64) -> Result<()> {
    let (table, fk) = match media_type {
        MediaType::Image => ("image_tags", "image_id"),
        MediaType::Document => ("document_tags", "document_id"),
        MediaType::Video => ("video_tags", "video_id"),
        MediaType::Audio => ("audio_tags", "audio_id"),
        MediaType::Unknown => bail!("unknown media type"),
    };
    let conn = db.get()?;
    conn.execute(
        &format!("INSERT OR IGNORE INTO {} ({}, tag_id) VALUES (?, ?)", table, fk),
        (record_id, tag_id),
    )?;
    Ok(())
}
