//! Synchronizes a folder of images and a product catalog into the content
//! store: media first, then products that link to that media.

pub mod catalog;
pub mod error;
pub mod media;
pub mod products;
pub mod report;
pub mod stop;

pub use catalog::{parse_catalog, read_catalog, CatalogRecord};
pub use error::{ItemError, SyncError};
pub use media::{MediaOptions, MediaUploader};
pub use products::{ProductImporter, ProductOptions};
pub use report::{EntityKind, ItemOutcome, ItemReport, Report, Summary};
pub use stop::StopFlag;
