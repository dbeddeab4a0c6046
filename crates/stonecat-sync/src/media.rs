//! Uploading a directory of images as media records.

use std::path::{Path, PathBuf};

use serde::Serialize;
use stonecat_core::{alt_text, stone_name};
use stonecat_store::StoreClient;

use crate::error::{ItemError, SyncError};
use crate::report::{EntityKind, ItemOutcome, ItemReport, Report};
use crate::stop::StopFlag;

#[derive(Debug, Clone)]
pub struct MediaOptions {
    pub collection: String,
    /// Lower-case extensions without the leading dot.
    pub extensions: Vec<String>,
    pub dry_run: bool,
}

/// Metadata sent alongside each uploaded file.
#[derive(Debug, Serialize)]
struct MediaMetadata<'a> {
    alt: &'a str,
}

/// One directory entry, in the order it will be processed.
struct DirEntry {
    path: PathBuf,
    file_name: Option<String>,
    is_file: bool,
}

pub struct MediaUploader<'a> {
    client: &'a StoreClient,
    options: MediaOptions,
    stop: StopFlag,
}

impl<'a> MediaUploader<'a> {
    #[must_use]
    pub fn new(client: &'a StoreClient, options: MediaOptions) -> Self {
        Self {
            client,
            options,
            stop: StopFlag::new(),
        }
    }

    #[must_use]
    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    /// Uploads every eligible file of `dir`, one at a time.
    ///
    /// Entries are processed in file-name order. A failed upload is recorded
    /// and the loop moves on; entries that are not allow-listed image files
    /// are recorded as skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MediaDirectory`] if `dir` cannot be listed. No
    /// upload is attempted in that case.
    pub async fn run(&self, dir: &Path) -> Result<Report, SyncError> {
        let entries = list_directory(dir).await?;
        let eligible = entries
            .iter()
            .filter(|e| e.is_file && self.is_eligible(&e.path))
            .count();
        tracing::info!(
            dir = %dir.display(),
            entries = entries.len(),
            eligible,
            dry_run = self.options.dry_run,
            "starting media upload"
        );

        let mut report = Report::new(EntityKind::Media);
        for entry in entries {
            let key = entry
                .file_name
                .clone()
                .unwrap_or_else(|| entry.path.to_string_lossy().into_owned());

            if !entry.is_file {
                tracing::debug!(path = %entry.path.display(), "skipping non-file entry");
                report.push(ItemReport::skipped(key, "not a regular file"));
                continue;
            }
            if !self.is_eligible(&entry.path) {
                tracing::debug!(
                    path = %entry.path.display(),
                    "skipping file with non allow-listed extension"
                );
                report.push(ItemReport::skipped(key, "extension not allowed"));
                continue;
            }
            // An image whose name cannot be turned into alt text.
            let Some(file_name) = entry.file_name.as_deref() else {
                tracing::warn!(path = %entry.path.display(), "image file name is not UTF-8");
                report.push(ItemReport::failed(
                    key,
                    ItemError::MalformedInput {
                        reason: "file name is not valid UTF-8".to_owned(),
                    },
                ));
                continue;
            };
            if self.stop.is_stop_requested() {
                report.push(ItemReport::skipped(key, "stop requested"));
                continue;
            }

            report.push(self.upload_one(&entry.path, file_name).await);
        }

        let summary = report.summary();
        tracing::info!(
            created = summary.created,
            skipped = summary.skipped,
            failed = summary.failed,
            "media upload finished"
        );
        Ok(report)
    }

    fn is_eligible(&self, path: &Path) -> bool {
        has_allowed_extension(path, &self.options.extensions)
    }

    async fn upload_one(&self, path: &Path, file_name: &str) -> ItemReport {
        let name = stone_name(file_name);
        let alt = alt_text(&name);

        if self.options.dry_run {
            tracing::info!(file = file_name, alt = %alt, "dry-run: would upload media");
            return ItemReport::skipped(file_name, "dry run");
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                let error = ItemError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::error!(file = file_name, error = %error, "media upload failed");
                return ItemReport::failed(file_name, error);
            }
        };
        let content_type = mime_guess::from_path(path).first_or_octet_stream();

        match self
            .client
            .create_with_file(
                &self.options.collection,
                bytes,
                file_name,
                content_type.essence_str(),
                &MediaMetadata { alt: &alt },
            )
            .await
        {
            Ok(record) => {
                tracing::info!(file = file_name, stone = %name, id = %record.id, "uploaded media");
                ItemReport::new(file_name, ItemOutcome::Created { id: record.id })
            }
            Err(err) => {
                tracing::error!(
                    file = file_name,
                    stone = %name,
                    status = ?err.status(),
                    error = %err,
                    "media upload failed"
                );
                ItemReport::failed(file_name, err.into())
            }
        }
    }
}

/// Whether `path` ends in one of `extensions` (case-insensitive). Works on
/// the raw `OsStr`, so a non UTF-8 stem does not hide the extension.
fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|allowed| *allowed == ext)
        })
}

async fn list_directory(dir: &Path) -> Result<Vec<DirEntry>, SyncError> {
    let io_err = |source: std::io::Error| SyncError::MediaDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        // Follows symlinks, so a link to an image counts as a file.
        let is_file = tokio::fs::metadata(&path)
            .await
            .is_ok_and(|m| m.is_file());
        entries.push(DirEntry {
            file_name: entry.file_name().into_string().ok(),
            path,
            is_file,
        });
    }
    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(entries)
}
