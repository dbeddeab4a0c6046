//! Command handlers for the CLI.
//!
//! Handlers return the per-item [`Report`]s; only configuration and
//! input-opening problems are returned as errors. Item failures are logged
//! by the uploader and importer and surface in the printed summary.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stonecat_core::{AppConfig, ProductDefaults};
use stonecat_store::StoreClient;
use stonecat_sync::{
    MediaOptions, MediaUploader, ProductImporter, ProductOptions, Report, StopFlag,
};

/// Exit code when the run finished but at least one item failed.
const EXIT_ITEM_FAILURES: u8 = 2;

/// Requests a cooperative stop on the first Ctrl-C. The item in flight
/// finishes; the rest are reported as skipped.
pub(crate) fn install_stop_handler(stop: StopFlag) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        tracing::warn!("interrupt received, stopping after the current item");
        stop.request_stop();
    });
}

/// `--dir` wins over `STONECAT_MEDIA_DIR`.
///
/// # Errors
///
/// Returns an error when neither is set.
pub(crate) fn resolve_media_dir(
    flag: Option<PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<PathBuf> {
    flag.or_else(|| config.media_dir.clone()).ok_or_else(|| {
        anyhow::anyhow!("no image directory given; pass --dir or set STONECAT_MEDIA_DIR")
    })
}

/// `--catalog` wins over `STONECAT_CATALOG_PATH`.
///
/// # Errors
///
/// Returns an error when neither is set.
pub(crate) fn resolve_catalog_path(
    flag: Option<PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<PathBuf> {
    flag.or_else(|| config.catalog_path.clone()).ok_or_else(|| {
        anyhow::anyhow!("no catalog given; pass --catalog or set STONECAT_CATALOG_PATH")
    })
}

pub(crate) fn media_options(config: &AppConfig, dry_run: bool) -> MediaOptions {
    MediaOptions {
        collection: config.media_collection.clone(),
        extensions: config.image_extensions.clone(),
        dry_run,
    }
}

pub(crate) fn product_options(config: &AppConfig, dry_run: bool) -> ProductOptions {
    ProductOptions {
        media_collection: config.media_collection.clone(),
        products_collection: config.products_collection.clone(),
        alt_lookup: config.alt_lookup,
        defaults: ProductDefaults {
            inventory: config.default_inventory,
            price_min_usd: config.price_min_usd,
            price_max_usd: config.price_max_usd,
            status: config.product_status.clone(),
        },
        dry_run,
    }
}

/// Uploads the image directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub(crate) async fn run_media(
    client: &StoreClient,
    config: &AppConfig,
    dir: &Path,
    dry_run: bool,
    stop: StopFlag,
) -> anyhow::Result<Report> {
    let report = MediaUploader::new(client, media_options(config, dry_run))
        .with_stop_flag(stop)
        .run(dir)
        .await?;
    Ok(report)
}

/// Reads the catalog and creates one product per row.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or lacks a required column.
pub(crate) async fn run_products(
    client: &StoreClient,
    config: &AppConfig,
    catalog: &Path,
    dry_run: bool,
    stop: StopFlag,
) -> anyhow::Result<Report> {
    let records = stonecat_sync::read_catalog(catalog, config.csv_delimiter)?;
    let report = ProductImporter::new(client, product_options(config, dry_run))
        .with_stop_flag(stop)
        .run(&records)
        .await;
    Ok(report)
}

/// Media first, then products.
///
/// The catalog is read before any upload so a broken catalog aborts the run
/// without leaving orphaned media behind.
///
/// # Errors
///
/// Returns an error if the catalog or the image directory cannot be read.
pub(crate) async fn run_sync(
    client: &StoreClient,
    config: &AppConfig,
    dir: &Path,
    catalog: &Path,
    dry_run: bool,
    stop: StopFlag,
) -> anyhow::Result<Vec<Report>> {
    let records = stonecat_sync::read_catalog(catalog, config.csv_delimiter)?;

    let media = MediaUploader::new(client, media_options(config, dry_run))
        .with_stop_flag(stop.clone())
        .run(dir)
        .await?;
    if media.has_failures() {
        tracing::warn!(
            failed = media.failed(),
            "some media failed to upload; affected products will have no gallery"
        );
    }

    let products = ProductImporter::new(client, product_options(config, dry_run))
        .with_stop_flag(stop)
        .run(&records)
        .await;

    Ok(vec![media, products])
}

/// Prints the summary line and one line per failed item, for a manual retry
/// pass.
pub(crate) fn print_report(report: &Report) {
    println!("{}", report.summary());
    for (key, error) in report.failures() {
        println!("  failed {key}: {error}");
    }
}

pub(crate) fn exit_code(reports: &[Report]) -> ExitCode {
    if reports.iter().any(Report::has_failures) {
        ExitCode::from(EXIT_ITEM_FAILURES)
    } else {
        ExitCode::SUCCESS
    }
}
