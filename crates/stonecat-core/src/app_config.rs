use std::path::PathBuf;

/// How the product importer locates the media record for a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltLookup {
    /// `where[alt][equals]` only.
    Exact,
    /// `where[alt][like]` only.
    Like,
    /// Exact match first; `like` only when the exact lookup finds nothing.
    ExactThenLike,
}

impl std::fmt::Display for AltLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AltLookup::Exact => write!(f, "exact"),
            AltLookup::Like => write!(f, "like"),
            AltLookup::ExactThenLike => write!(f, "exact-then-like"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub api_token: String,
    pub auth_scheme: String,
    pub media_dir: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub image_extensions: Vec<String>,
    pub csv_delimiter: u8,
    pub media_collection: String,
    pub products_collection: String,
    pub alt_lookup: AltLookup,
    pub default_inventory: u32,
    pub price_min_usd: u32,
    pub price_max_usd: u32,
    pub product_status: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[redacted]")
            .field("auth_scheme", &self.auth_scheme)
            .field("media_dir", &self.media_dir)
            .field("catalog_path", &self.catalog_path)
            .field("image_extensions", &self.image_extensions)
            .field("csv_delimiter", &char::from(self.csv_delimiter))
            .field("media_collection", &self.media_collection)
            .field("products_collection", &self.products_collection)
            .field("alt_lookup", &self.alt_lookup)
            .field("default_inventory", &self.default_inventory)
            .field("price_min_usd", &self.price_min_usd)
            .field("price_max_usd", &self.price_max_usd)
            .field("product_status", &self.product_status)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}
