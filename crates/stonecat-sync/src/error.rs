use std::path::PathBuf;

use stonecat_store::StoreError;
use thiserror::Error;

/// Why a single file or catalog row could not be synchronized.
///
/// These never abort a batch; they are recorded in the item's outcome.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors detected before any item is processed. These fail the whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("cannot read media directory {}: {source}", .path.display())]
    MediaDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read catalog {}: {source}", .path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("catalog {} is missing required column \"{column}\"", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
}
