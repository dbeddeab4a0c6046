use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stonecat_core::{AltLookup, AppConfig};
use stonecat_sync::{EntityKind, ItemError, ItemOutcome, ItemReport, Report};

use super::*;

fn test_config() -> AppConfig {
    AppConfig {
        base_url: "http://localhost:3000/api".to_owned(),
        api_token: "test-token".to_owned(),
        auth_scheme: "JWT".to_owned(),
        media_dir: Some(PathBuf::from("/data/stones")),
        catalog_path: None,
        image_extensions: vec!["png".to_owned(), "jpg".to_owned()],
        csv_delimiter: b';',
        media_collection: "media".to_owned(),
        products_collection: "stones".to_owned(),
        alt_lookup: AltLookup::Exact,
        default_inventory: 5,
        price_min_usd: 10,
        price_max_usd: 40,
        product_status: "draft".to_owned(),
        request_timeout_secs: 30,
        max_retries: 3,
        retry_backoff_base_ms: 1000,
        user_agent: "stonecat-test/0.1".to_owned(),
        log_level: "info".to_owned(),
    }
}

fn report_with(kind: EntityKind, outcome: ItemOutcome) -> Report {
    let mut report = Report::new(kind);
    report.items.push(ItemReport {
        key: "Onyx (line 2)".to_owned(),
        outcome,
        warnings: Vec::new(),
    });
    report
}

#[test]
fn parses_media_command() {
    let cli = Cli::try_parse_from(["stonecat", "media"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Media {
            dir: None,
            dry_run: false
        }
    ));
}

#[test]
fn parses_media_dir_and_dry_run() {
    let cli = Cli::try_parse_from(["stonecat", "media", "--dir", "./stones", "--dry-run"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Media {
            dir: Some(ref d),
            dry_run: true
        } if d == Path::new("./stones")
    ));
}

#[test]
fn parses_products_catalog() {
    let cli = Cli::try_parse_from(["stonecat", "products", "--catalog", "stones.csv"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Products {
            catalog: Some(ref c),
            dry_run: false
        } if c == Path::new("stones.csv")
    ));
}

#[test]
fn parses_sync_with_all_flags() {
    let cli = Cli::try_parse_from([
        "stonecat",
        "sync",
        "--dir",
        "img",
        "--catalog",
        "stones.csv",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Sync {
            dir: Some(_),
            catalog: Some(_),
            dry_run: true
        }
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["stonecat"]).is_err());
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(Cli::try_parse_from(["stonecat", "media", "--brand", "x"]).is_err());
}

#[test]
fn dir_flag_overrides_config() {
    let config = test_config();
    let dir = commands::resolve_media_dir(Some(PathBuf::from("./other")), &config).unwrap();
    assert_eq!(dir, PathBuf::from("./other"));
}

#[test]
fn dir_falls_back_to_config() {
    let config = test_config();
    let dir = commands::resolve_media_dir(None, &config).unwrap();
    assert_eq!(dir, PathBuf::from("/data/stones"));
}

#[test]
fn missing_catalog_names_flag_and_env_var() {
    let config = test_config();
    let err = commands::resolve_catalog_path(None, &config).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("--catalog"), "got: {msg}");
    assert!(msg.contains("STONECAT_CATALOG_PATH"), "got: {msg}");
}

#[test]
fn product_options_follow_config() {
    let options = commands::product_options(&test_config(), true);
    assert_eq!(options.products_collection, "stones");
    assert_eq!(options.alt_lookup, AltLookup::Exact);
    assert_eq!(options.defaults.inventory, 5);
    assert_eq!(options.defaults.price_min_usd, 10);
    assert_eq!(options.defaults.price_max_usd, 40);
    assert_eq!(options.defaults.status, "draft");
    assert!(options.dry_run);
}

#[test]
fn media_options_follow_config() {
    let options = commands::media_options(&test_config(), false);
    assert_eq!(options.collection, "media");
    assert_eq!(options.extensions, vec!["png", "jpg"]);
    assert!(!options.dry_run);
}

#[test]
fn exit_code_is_success_without_failures() {
    let reports = vec![
        report_with(
            EntityKind::Media,
            ItemOutcome::Skipped {
                reason: "dry run".to_owned(),
            },
        ),
        Report::new(EntityKind::Products),
    ];
    assert_eq!(commands::exit_code(&reports), ExitCode::SUCCESS);
}

#[test]
fn exit_code_signals_item_failures() {
    let reports = vec![
        Report::new(EntityKind::Media),
        report_with(
            EntityKind::Products,
            ItemOutcome::Failed {
                error: ItemError::MalformedInput {
                    reason: "name is empty".to_owned(),
                },
            },
        ),
    ];
    assert_eq!(commands::exit_code(&reports), ExitCode::from(2));
}
