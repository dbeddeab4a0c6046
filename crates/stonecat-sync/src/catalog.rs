//! Reading the product catalog export.
//!
//! Problems with the file as a whole (unreadable, missing column) are fatal
//! and reported before any row is processed. Problems with a single row are
//! kept next to that row so the importer can record them as failures.

use std::io::Read;
use std::path::Path;

use stonecat_core::SourceRow;

use crate::error::SyncError;

/// Columns every catalog must have. `description` is optional.
pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "origin", "type", "short_description"];

/// One data row of the catalog and its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub line: u64,
    /// The parsed row, or why it could not be parsed.
    pub row: Result<SourceRow, String>,
}

/// Opens and parses the catalog at `path`.
///
/// # Errors
///
/// - [`SyncError::Catalog`] if the file cannot be opened or read.
/// - [`SyncError::MissingColumn`] if a required header is absent.
pub fn read_catalog(path: &Path, delimiter: u8) -> Result<Vec<CatalogRecord>, SyncError> {
    let file = std::fs::File::open(path).map_err(|e| SyncError::Catalog {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    parse_catalog(file, delimiter, path)
}

/// Parses catalog rows from any reader. `path` is only used in errors.
///
/// # Errors
///
/// Same as [`read_catalog`].
pub fn parse_catalog<R: Read>(
    reader: R,
    delimiter: u8,
    path: &Path,
) -> Result<Vec<CatalogRecord>, SyncError> {
    let fatal = |source: csv::Error| SyncError::Catalog {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(b'"')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers().map_err(fatal)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SyncError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        match result {
            Ok(record) => {
                let line = record.position().map_or(0, csv::Position::line);
                // Fully blank lines in spreadsheet exports carry no product.
                if record.iter().all(|field| field.trim().is_empty()) {
                    continue;
                }
                let row = record
                    .deserialize::<SourceRow>(Some(&headers))
                    .map_err(|e| e.to_string());
                records.push(CatalogRecord { line, row });
            }
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => return Err(fatal(err)),
            Err(err) => {
                let line = err.position().map_or(0, csv::Position::line);
                records.push(CatalogRecord {
                    line,
                    row: Err(err.to_string()),
                });
            }
        }
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "catalog parsed");
    Ok(records)
}
