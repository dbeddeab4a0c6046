mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stonecat")]
#[command(about = "Bulk-import stone images and a product catalog into the content store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upload every allow-listed image in a directory as a media record
    Media {
        /// Image directory (defaults to STONECAT_MEDIA_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// List what would be uploaded without sending anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Create one product per catalog row, linked to its media by alt text
    Products {
        /// Catalog file (defaults to STONECAT_CATALOG_PATH)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Map rows and look up media without creating products
        #[arg(long)]
        dry_run: bool,
    },
    /// Upload media, then import products
    Sync {
        /// Image directory (defaults to STONECAT_MEDIA_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Catalog file (defaults to STONECAT_CATALOG_PATH)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Preview both steps without writing to the store
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = stonecat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = stonecat_store::StoreClient::new(
        &stonecat_store::StoreClientOptions::from_app_config(&config),
    )
    .map_err(|e| anyhow::anyhow!("failed to build store client: {e}"))?;

    let stop = stonecat_sync::StopFlag::new();
    commands::install_stop_handler(stop.clone());

    let reports = match cli.command {
        Commands::Media { dir, dry_run } => {
            let dir = commands::resolve_media_dir(dir, &config)?;
            vec![commands::run_media(&client, &config, &dir, dry_run, stop).await?]
        }
        Commands::Products { catalog, dry_run } => {
            let catalog = commands::resolve_catalog_path(catalog, &config)?;
            vec![commands::run_products(&client, &config, &catalog, dry_run, stop).await?]
        }
        Commands::Sync {
            dir,
            catalog,
            dry_run,
        } => {
            let dir = commands::resolve_media_dir(dir, &config)?;
            let catalog = commands::resolve_catalog_path(catalog, &config)?;
            commands::run_sync(&client, &config, &dir, &catalog, dry_run, stop).await?
        }
    };

    for report in &reports {
        commands::print_report(report);
    }
    Ok(commands::exit_code(&reports))
}

#[cfg(test)]
mod tests;
