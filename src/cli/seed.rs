use crate::services::folders;
use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;

    db.migrate()?;

    let created = folders::seed_default_folders(&db)?;
    tracing::info!("Successfully created {} new folders", created);

    Ok(())
}
