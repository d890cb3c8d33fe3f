pub mod import;
pub mod init;
pub mod migrate;
pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medley")]
#[command(version)]
#[command(about = "A lightweight media library dashboard", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "medley.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new library in the given directory
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Start the dashboard server
    Serve {
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Run pending database migrations
    Migrate,
    /// Create the default media folders (idempotent)
    Seed,
    /// Register an existing file in the library
    Import {
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        folder: Option<i64>,
    },
}
