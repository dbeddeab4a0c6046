pub mod app_config;
pub mod config;
pub mod naming;
pub mod products;
pub mod record;
pub mod richtext;

pub use app_config::{AltLookup, AppConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use naming::{alt_text, normalize_stone_name, stone_name};
pub use products::{GalleryItem, ProductDefaults, ProductPayload, SourceRow};
pub use record::RecordId;
pub use richtext::RichTextDocument;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
