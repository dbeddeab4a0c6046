use crate::app_config::{AltLookup, AppConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let base_url = require("STONECAT_BASE_URL")?;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "STONECAT_BASE_URL",
            format!("expected an http(s) URL, got '{base_url}'"),
        ));
    }
    let api_token = require("STONECAT_API_TOKEN")?;
    let auth_scheme = or_default("STONECAT_AUTH_SCHEME", "JWT").trim().to_string();
    if auth_scheme.is_empty() || auth_scheme.contains(char::is_whitespace) {
        return Err(invalid(
            "STONECAT_AUTH_SCHEME",
            "must be a single word such as JWT or Bearer".to_string(),
        ));
    }

    let media_dir = lookup("STONECAT_MEDIA_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);
    let catalog_path = lookup("STONECAT_CATALOG_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let image_extensions = parse_extensions(&or_default("STONECAT_IMAGE_EXTENSIONS", "png"))?;
    let csv_delimiter = parse_delimiter(&or_default("STONECAT_CSV_DELIMITER", ","))?;

    let media_collection = parse_slug(
        "STONECAT_MEDIA_COLLECTION",
        &or_default("STONECAT_MEDIA_COLLECTION", "media"),
    )?;
    let products_collection = parse_slug(
        "STONECAT_PRODUCTS_COLLECTION",
        &or_default("STONECAT_PRODUCTS_COLLECTION", "products"),
    )?;
    let alt_lookup = parse_alt_lookup(&or_default("STONECAT_ALT_LOOKUP", "exact-then-like"))?;

    let default_inventory = parse_u32("STONECAT_DEFAULT_INVENTORY", "20")?;
    let price_min_usd = parse_u32("STONECAT_PRICE_MIN_USD", "15")?;
    let price_max_usd = parse_u32("STONECAT_PRICE_MAX_USD", "15")?;
    if price_min_usd > price_max_usd {
        return Err(invalid(
            "STONECAT_PRICE_MAX_USD",
            format!("must be >= STONECAT_PRICE_MIN_USD ({price_min_usd}), got {price_max_usd}"),
        ));
    }
    let product_status = or_default("STONECAT_PRODUCT_STATUS", "published")
        .trim()
        .to_string();
    if product_status.is_empty() {
        return Err(invalid(
            "STONECAT_PRODUCT_STATUS",
            "must not be blank, e.g. published or draft".to_string(),
        ));
    }

    let request_timeout_secs = parse_u64("STONECAT_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "STONECAT_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let max_retries = parse_u32("STONECAT_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("STONECAT_RETRY_BACKOFF_BASE_MS", "1000")?;
    let user_agent = or_default("STONECAT_USER_AGENT", "stonecat/0.1 (catalog-import)");
    let log_level = or_default("STONECAT_LOG_LEVEL", "info");

    Ok(AppConfig {
        base_url,
        api_token,
        auth_scheme,
        media_dir,
        catalog_path,
        image_extensions,
        csv_delimiter,
        media_collection,
        products_collection,
        alt_lookup,
        default_inventory,
        price_min_usd,
        price_max_usd,
        product_status,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        user_agent,
        log_level,
    })
}

/// Parse a comma-separated extension allow-list. Leading dots are dropped and
/// entries are lower-cased so matching is case-insensitive.
fn parse_extensions(raw: &str) -> Result<Vec<String>, ConfigError> {
    let extensions: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if extensions.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "STONECAT_IMAGE_EXTENSIONS".to_string(),
            reason: "at least one extension is required".to_string(),
        });
    }
    Ok(extensions)
}

/// Parse the catalog delimiter. `tab` and `\t` select a tab character.
fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "STONECAT_CSV_DELIMITER".to_string(),
        reason,
    };
    match raw {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        _ => {}
    }
    let mut bytes = raw.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b), None) if b.is_ascii() && !b.is_ascii_alphanumeric() && b != b'"' => Ok(b),
        _ => Err(invalid(format!(
            "expected a single ASCII punctuation character, got '{raw}'"
        ))),
    }
}

fn parse_slug(var: &str, raw: &str) -> Result<String, ConfigError> {
    let slug = raw.trim().trim_matches('/');
    if slug.is_empty() || slug.contains(['/', '?', '#', ' ']) {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("'{raw}' is not a collection slug"),
        });
    }
    Ok(slug.to_string())
}

/// Parse a string into an `AltLookup` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_alt_lookup(s: &str) -> Result<AltLookup, ConfigError> {
    match s.trim() {
        "exact" => Ok(AltLookup::Exact),
        "like" => Ok(AltLookup::Like),
        "exact-then-like" => Ok(AltLookup::ExactThenLike),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STONECAT_ALT_LOOKUP".to_string(),
            reason: format!("expected exact, like or exact-then-like, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
