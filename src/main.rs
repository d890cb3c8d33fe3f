use clap::Parser;
use medley::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medley=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path, name }) => {
            medley::cli::init::run(path, name).await?;
        }
        Some(Commands::Serve { host, port }) => {
            medley::cli::serve::run(&cli.config, &host, port).await?;
        }
        Some(Commands::Migrate) => {
            medley::cli::migrate::run(&cli.config).await?;
        }
        Some(Commands::Seed) => {
            medley::cli::seed::run(&cli.config).await?;
        }
        Some(Commands::Import {
            file,
            title,
            folder,
        }) => {
            medley::cli::import::run(&cli.config, file, title, folder).await?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
