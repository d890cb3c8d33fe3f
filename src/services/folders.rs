use crate::models::Folder;
use crate::services::slug::generate_slug;
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};
use std::collections::HashSet;

/// Domain refusals for folder mutations. None of these abort a request;
/// handlers map them to a reported message.
#[derive(Debug, thiserror::Error)]
pub enum FolderError {
    #[error("Folder name is required.")]
    NameRequired,
    #[error("Folder not found.")]
    NotFound,
    #[error("Cannot delete folder. It must be empty and not a system folder.")]
    NotDeletable,
    #[error("Cannot move a folder into itself or its own subtree.")]
    IntoOwnSubtree,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

const FOLDER_COLUMNS: &str =
    "id, name, slug, description, icon, color, sort_order, parent_id, is_system, created_by, created_at";

fn map_folder(row: &Row) -> rusqlite::Result<Folder> {
    Ok(Folder {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        sort_order: row.get(6)?,
        parent_id: row.get(7)?,
        is_system: row.get::<_, i64>(8)? != 0,
        created_by: row.get(9)?,
        created_at: row.get(10)?,
    })
}

pub fn get_folder(db: &Database, id: i64) -> Result<Option<Folder>> {
    let conn = db.get()?;
    Ok(get_folder_conn(&conn, id)?)
}

fn get_folder_conn(conn: &Connection, id: i64) -> rusqlite::Result<Option<Folder>> {
    conn.query_row(
        &format!("SELECT {} FROM folders WHERE id = ?", FOLDER_COLUMNS),
        [id],
        map_folder,
    )
    .optional()
}

/// Direct children of a folder, or the root-level folders when `parent`
/// is `None`. Ordered by (sort_order, name).
pub fn list_children(db: &Database, parent: Option<i64>) -> Result<Vec<Folder>> {
    let conn = db.get()?;
    let (sql, param): (String, Vec<i64>) = match parent {
        Some(id) => (
            format!(
                "SELECT {} FROM folders WHERE parent_id = ? ORDER BY sort_order, name",
                FOLDER_COLUMNS
            ),
            vec![id],
        ),
        None => (
            format!(
                "SELECT {} FROM folders WHERE parent_id IS NULL ORDER BY sort_order, name",
                FOLDER_COLUMNS
            ),
            vec![],
        ),
    };
    let mut stmt = conn.prepare(&sql)?;
    let folders = stmt
        .query_map(rusqlite::params_from_iter(param.iter()), map_folder)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(folders)
}

/// Breadcrumb chain from the root down to (and including) `folder`.
/// The visited set stops a corrupted parent chain from looping.
pub fn breadcrumbs(db: &Database, folder: &Folder) -> Result<Vec<Folder>> {
    let conn = db.get()?;
    let mut chain = vec![folder.clone()];
    let mut seen: HashSet<i64> = HashSet::from([folder.id]);

    let mut parent = folder.parent_id;
    while let Some(pid) = parent {
        if !seen.insert(pid) {
            tracing::warn!("Folder {} has a cyclic parent chain", folder.id);
            break;
        }
        match get_folder_conn(&conn, pid)? {
            Some(f) => {
                parent = f.parent_id;
                chain.push(f);
            }
            None => break,
        }
    }

    chain.reverse();
    Ok(chain)
}

pub fn create_folder(
    db: &Database,
    name: &str,
    parent_id: Option<i64>,
    description: &str,
    created_by: Option<&str>,
) -> Result<Folder, FolderError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FolderError::NameRequired);
    }

    let conn = db.get()?;

    // A parent id that does not resolve degrades to "no parent".
    let parent_id = match parent_id {
        Some(pid) => get_folder_conn(&conn, pid)
            .map_err(anyhow::Error::from)?
            .map(|f| f.id),
        None => None,
    };

    conn.execute(
        "INSERT INTO folders (name, slug, description, parent_id, created_by) VALUES (?, ?, ?, ?, ?)",
        (name, generate_slug(name), description, parent_id, created_by),
    )
    .map_err(anyhow::Error::from)?;

    let id = conn.last_insert_rowid();
    tracing::info!("Created folder '{}' ({})", name, id);

    get_folder_conn(&conn, id)
        .map_err(anyhow::Error::from)?
        .ok_or(FolderError::NotFound)
}

pub fn rename_folder(db: &Database, id: i64, name: &str) -> Result<Folder, FolderError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FolderError::NameRequired);
    }

    let conn = db.get()?;
    let folder = get_folder_conn(&conn, id)
        .map_err(anyhow::Error::from)?
        .ok_or(FolderError::NotFound)?;

    conn.execute(
        "UPDATE folders SET name = ?, slug = ? WHERE id = ?",
        (name, generate_slug(name), folder.id),
    )
    .map_err(anyhow::Error::from)?;

    get_folder_conn(&conn, id)
        .map_err(anyhow::Error::from)?
        .ok_or(FolderError::NotFound)
}

fn child_count(conn: &Connection, id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM folders WHERE parent_id = ?",
        [id],
        |row| row.get(0),
    )
}

/// Assigned media across all four sources.
fn media_count_conn(conn: &Connection, id: i64) -> rusqlite::Result<i64> {
    let mut total = 0i64;
    for table in ["images", "documents", "videos", "audio"] {
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE folder_id = ?", table),
            [id],
            |row| row.get(0),
        )?;
        total += count;
    }
    Ok(total)
}

/// A folder is deletable iff it has no child folders, no assigned media
/// in any source, and is not a system folder.
pub fn can_delete(db: &Database, folder: &Folder) -> Result<bool> {
    let conn = db.get()?;
    Ok(can_delete_conn(&conn, folder)?)
}

fn can_delete_conn(conn: &Connection, folder: &Folder) -> rusqlite::Result<bool> {
    if folder.is_system {
        return Ok(false);
    }
    Ok(child_count(conn, folder.id)? == 0 && media_count_conn(conn, folder.id)? == 0)
}

/// Guarded delete. The guard and the delete run in one transaction so a
/// concurrent move into the folder cannot slip between them.
pub fn delete_folder(db: &Database, id: i64) -> Result<Folder, FolderError> {
    let mut conn = db.get()?;
    let tx = conn.transaction().map_err(anyhow::Error::from)?;

    let folder = get_folder_conn(&tx, id)
        .map_err(anyhow::Error::from)?
        .ok_or(FolderError::NotFound)?;

    if !can_delete_conn(&tx, &folder).map_err(anyhow::Error::from)? {
        return Err(FolderError::NotDeletable);
    }

    tx.execute("DELETE FROM folders WHERE id = ?", [id])
        .map_err(anyhow::Error::from)?;
    tx.commit().map_err(anyhow::Error::from)?;

    tracing::info!("Deleted folder '{}' ({})", folder.name, folder.id);
    Ok(folder)
}

/// Re-parent a folder. Refuses to create a cycle: the new parent must
/// not be the folder itself or any of its descendants.
pub fn move_folder(
    db: &Database,
    id: i64,
    new_parent: Option<i64>,
) -> Result<Folder, FolderError> {
    let mut conn = db.get()?;
    let tx = conn.transaction().map_err(anyhow::Error::from)?;

    let folder = get_folder_conn(&tx, id)
        .map_err(anyhow::Error::from)?
        .ok_or(FolderError::NotFound)?;

    let new_parent = match new_parent {
        Some(pid) => {
            let parent = get_folder_conn(&tx, pid)
                .map_err(anyhow::Error::from)?
                .ok_or(FolderError::NotFound)?;

            // Walk up from the target parent; hitting `id` means the
            // target sits inside the folder being moved.
            let mut seen: HashSet<i64> = HashSet::new();
            let mut cursor = Some(parent.id);
            while let Some(cid) = cursor {
                if cid == id {
                    return Err(FolderError::IntoOwnSubtree);
                }
                if !seen.insert(cid) {
                    break;
                }
                cursor = get_folder_conn(&tx, cid)
                    .map_err(anyhow::Error::from)?
                    .and_then(|f| f.parent_id);
            }
            Some(parent.id)
        }
        None => None,
    };

    tx.execute(
        "UPDATE folders SET parent_id = ? WHERE id = ?",
        (new_parent, folder.id),
    )
    .map_err(anyhow::Error::from)?;
    tx.commit().map_err(anyhow::Error::from)?;

    get_folder(db, id)?.ok_or(FolderError::NotFound)
}

struct DefaultFolder {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
    order: i64,
}

const DEFAULT_FOLDERS: &[DefaultFolder] = &[
    DefaultFolder {
        name: "Banners",
        description: "Marketing banners and promotional images",
        icon: "fa-flag",
        color: "#FF6B9D",
        order: 1,
    },
    DefaultFolder {
        name: "Products",
        description: "Product images and media",
        icon: "fa-box",
        color: "#4A90E2",
        order: 2,
    },
    DefaultFolder {
        name: "Campaigns",
        description: "Marketing campaign assets",
        icon: "fa-bullhorn",
        color: "#50E3C2",
        order: 3,
    },
    DefaultFolder {
        name: "Social Media",
        description: "Social media posts and graphics",
        icon: "fa-share-alt",
        color: "#9013FE",
        order: 4,
    },
    DefaultFolder {
        name: "Logos",
        description: "Company and brand logos",
        icon: "fa-copyright",
        color: "#F5A623",
        order: 5,
    },
    DefaultFolder {
        name: "Videos",
        description: "Video content and recordings",
        icon: "fa-video",
        color: "#4A90E2",
        order: 6,
    },
    DefaultFolder {
        name: "Audio",
        description: "Audio files and music",
        icon: "fa-music",
        color: "#50E3C2",
        order: 7,
    },
    DefaultFolder {
        name: "Documents",
        description: "PDFs and other documents",
        icon: "fa-file-alt",
        color: "#FF6B9D",
        order: 8,
    },
];

/// Seed the default root folders. Idempotent on (name, parent IS NULL):
/// re-running never duplicates. Seeded folders are system folders and
/// cannot be deleted.
pub fn seed_default_folders(db: &Database) -> Result<usize> {
    let conn = db.get()?;
    let mut created = 0usize;

    for folder in DEFAULT_FOLDERS {
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM folders WHERE name = ? AND parent_id IS NULL",
                [folder.name],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            tracing::debug!("Folder already exists: {}", folder.name);
            continue;
        }

        conn.execute(
            "INSERT INTO folders (name, slug, description, icon, color, sort_order, is_system)
             VALUES (?, ?, ?, ?, ?, ?, 1)",
            (
                folder.name,
                generate_slug(folder.name),
                folder.description,
                folder.icon,
                folder.color,
                folder.order,
            ),
        )?;
        created += 1;
        tracing::info!("Created folder: {}", folder.name);
    }

    Ok(created)
}
