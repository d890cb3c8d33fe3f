use crate::{Config, Database};
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use tera::{Tera, Value};

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub templates: Tera,
    pub media_dir: PathBuf,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let mut templates = Tera::default();

        templates.register_filter("format_date", format_date_filter);
        templates.register_filter("format_size", format_size_filter);
        templates.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html")),
            ("dashboard.html", include_str!("../../templates/dashboard.html")),
            ("image_detail.html", include_str!("../../templates/image_detail.html")),
            ("document_detail.html", include_str!("../../templates/document_detail.html")),
            ("video_detail.html", include_str!("../../templates/video_detail.html")),
            ("audio_detail.html", include_str!("../../templates/audio_detail.html")),
            ("404.html", include_str!("../../templates/404.html")),
        ])?;

        let media_dir = PathBuf::from(&config.media.upload_dir);

        Ok(Self {
            config,
            db,
            templates,
            media_dir,
        })
    }
}

fn format_date_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let date_str = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("format_date requires a string"))?;

    let format = args
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("%B %d, %Y");

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    Ok(Value::String(date_str.to_string()))
}

fn format_size_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let bytes = value
        .as_u64()
        .ok_or_else(|| tera::Error::msg("format_size requires a number"))?;

    let formatted = if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    };

    Ok(Value::String(formatted))
}
