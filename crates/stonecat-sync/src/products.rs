//! Creating product records from catalog rows.

use rand::Rng;
use stonecat_core::{alt_text, AltLookup, ProductDefaults, ProductPayload, RecordId, SourceRow};
use stonecat_store::{MatchMode, StoreClient, StoreError};

use crate::catalog::CatalogRecord;
use crate::error::ItemError;
use crate::report::{EntityKind, ItemOutcome, ItemReport, Report};
use crate::stop::StopFlag;

#[derive(Debug, Clone)]
pub struct ProductOptions {
    pub media_collection: String,
    pub products_collection: String,
    pub alt_lookup: AltLookup,
    pub defaults: ProductDefaults,
    pub dry_run: bool,
}

pub struct ProductImporter<'a> {
    client: &'a StoreClient,
    options: ProductOptions,
    stop: StopFlag,
}

impl<'a> ProductImporter<'a> {
    #[must_use]
    pub fn new(client: &'a StoreClient, options: ProductOptions) -> Self {
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

    /// Imports every catalog row, one at a time.
    ///
    /// Each row is independent: a malformed row, a network failure or a
    /// rejected payload is recorded against that row and the next row is
    /// processed.
    pub async fn run(&self, records: &[CatalogRecord]) -> Report {
        tracing::info!(
            rows = records.len(),
            dry_run = self.options.dry_run,
            lookup = %self.options.alt_lookup,
            "starting product import"
        );

        let mut report = Report::new(EntityKind::Products);
        for record in records {
            if self.stop.is_stop_requested() {
                report.push(ItemReport::skipped(row_key(record), "stop requested"));
                continue;
            }
            report.push(self.import_one(record).await);
        }

        let summary = report.summary();
        tracing::info!(
            created = summary.created,
            skipped = summary.skipped,
            failed = summary.failed,
            "product import finished"
        );
        report
    }

    async fn import_one(&self, record: &CatalogRecord) -> ItemReport {
        let key = row_key(record);

        let row = match &record.row {
            Ok(row) => row.normalized(),
            Err(reason) => {
                tracing::error!(line = record.line, reason = %reason, "unreadable catalog row");
                return ItemReport::failed(
                    key,
                    ItemError::MalformedInput {
                        reason: reason.clone(),
                    },
                );
            }
        };
        if row.name.is_empty() {
            tracing::error!(line = record.line, row = ?row, "catalog row has no name");
            return ItemReport::failed(
                key,
                ItemError::MalformedInput {
                    reason: "name is empty".to_owned(),
                },
            );
        }

        let mut warnings = Vec::new();
        let alt = alt_text(&row.name);
        let image = match self.resolve_image(&alt).await {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                tracing::warn!(product = %row.name, alt = %alt, "no media found");
                warnings.push(format!("no media found for \"{alt}\""));
                None
            }
            Err(err) => {
                tracing::warn!(product = %row.name, error = %err, "media lookup failed");
                warnings.push(format!("media lookup failed: {err}"));
                None
            }
        };

        let payload = ProductPayload::from_row(
            &row,
            &self.options.defaults,
            pick_price(&self.options.defaults),
            image,
        );

        if self.options.dry_run {
            tracing::info!(
                product = %row.name,
                gallery = payload.gallery.is_some(),
                paragraphs = payload.description.as_ref().map_or(0, |d| d.root.children.len()),
                "dry-run: would create product"
            );
            return ItemReport::skipped(key, "dry run").with_warnings(warnings);
        }

        match self
            .client
            .create(&self.options.products_collection, &payload)
            .await
        {
            Ok(created) => {
                tracing::info!(product = %row.name, id = %created.id, "created product");
                ItemReport::new(key, ItemOutcome::Created { id: created.id }).with_warnings(warnings)
            }
            Err(err) => {
                tracing::error!(
                    line = record.line,
                    row = ?row,
                    status = ?err.status(),
                    error = %err,
                    "product creation failed"
                );
                ItemReport::failed(key, err.into()).with_warnings(warnings)
            }
        }
    }

    /// Finds the media record whose alt text belongs to this product.
    async fn resolve_image(&self, alt: &str) -> Result<Option<RecordId>, StoreError> {
        let collection = &self.options.media_collection;
        let modes: &[MatchMode] = match self.options.alt_lookup {
            AltLookup::Exact => &[MatchMode::Equals],
            AltLookup::Like => &[MatchMode::Like],
            AltLookup::ExactThenLike => &[MatchMode::Equals, MatchMode::Like],
        };

        for (i, mode) in modes.iter().enumerate() {
            if i > 0 {
                tracing::debug!(alt, operator = mode.operator(), "falling back to looser lookup");
            }
            if let Some(found) = self.client.find_one(collection, "alt", *mode, alt).await? {
                return Ok(Some(found.id));
            }
        }
        Ok(None)
    }
}

/// `"<name> (line N)"`, or just the line when the row has no usable name.
fn row_key(record: &CatalogRecord) -> String {
    match &record.row {
        Ok(SourceRow { name, .. }) if !name.trim().is_empty() => {
            format!("{} (line {})", name.trim(), record.line)
        }
        _ => format!("line {}", record.line),
    }
}

/// Fixed price when the bounds are equal, otherwise uniform in the range.
fn pick_price(defaults: &ProductDefaults) -> u32 {
    if defaults.price_min_usd >= defaults.price_max_usd {
        return defaults.price_min_usd;
    }
    rand::rng().random_range(defaults.price_min_usd..=defaults.price_max_usd)
}
