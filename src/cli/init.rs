use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf, name: Option<String>) -> Result<()> {
    let site_name = name.unwrap_or_else(|| "Media Library".to_string());

    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(path.join("data"))?;
    std::fs::create_dir_all(path.join("data/media"))?;

    let config = format!(
        r#"[site]
title = "{}"
description = "Images, documents, video and audio in one place"
url = "http://localhost:3000"

[server]
host = "127.0.0.1"
port = 3000

[database]
path = "./data/medley.db"

[media]
upload_dir = "./data/media"
"#,
        site_name
    );

    std::fs::write(path.join("medley.toml"), config)?;

    tracing::info!("Created new media library at {:?}", path);
    tracing::info!("Run 'medley migrate' to set up the database");
    tracing::info!("Run 'medley seed' to create the default folders");
    tracing::info!("Run 'medley serve' to start the dashboard");

    Ok(())
}
