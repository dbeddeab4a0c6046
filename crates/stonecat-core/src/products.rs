use serde::{Deserialize, Serialize};

use crate::record::RecordId;
use crate::richtext::RichTextDocument;

/// One row of the product catalog, as read from the spreadsheet export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceRow {
    pub name: String,
    pub origin: String,
    #[serde(rename = "type")]
    pub stone_type: String,
    pub short_description: String,
    /// Optional column; absent or empty cells mean "no description".
    #[serde(default)]
    pub description: String,
}

impl SourceRow {
    /// Applies the catalog field mapping: every field trimmed, `origin` and
    /// `type` lower-cased.
    #[must_use]
    pub fn normalized(&self) -> SourceRow {
        SourceRow {
            name: self.name.trim().to_owned(),
            origin: self.origin.trim().to_lowercase(),
            stone_type: self.stone_type.trim().to_lowercase(),
            short_description: self.short_description.trim().to_owned(),
            description: self.description.trim().to_owned(),
        }
    }
}

/// Fixed values applied to every created product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDefaults {
    pub inventory: u32,
    pub price_min_usd: u32,
    pub price_max_usd: u32,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub image: RecordId,
}

/// JSON body of a product create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub title: String,
    #[serde(rename = "short_description")]
    pub short_description: String,
    pub origin: String,
    #[serde(rename = "type")]
    pub stone_type: String,
    pub inventory: u32,
    pub enable_variants: bool,
    #[serde(rename = "priceInUSDEnabled")]
    pub price_in_usd_enabled: bool,
    #[serde(rename = "priceInUSD")]
    pub price_in_usd: u32,
    #[serde(rename = "_status")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<RichTextDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<GalleryItem>>,
}

impl ProductPayload {
    /// Maps a catalog row onto a create payload.
    ///
    /// `gallery` is only set when `image` is `Some`, and `description` only
    /// when the row's description has non-blank text.
    #[must_use]
    pub fn from_row(
        row: &SourceRow,
        defaults: &ProductDefaults,
        price_in_usd: u32,
        image: Option<RecordId>,
    ) -> Self {
        let row = row.normalized();
        Self {
            description: RichTextDocument::from_plain_text(&row.description),
            gallery: image.map(|image| vec![GalleryItem { image }]),
            title: row.name,
            short_description: row.short_description,
            origin: row.origin,
            stone_type: row.stone_type,
            inventory: defaults.inventory,
            enable_variants: false,
            price_in_usd_enabled: true,
            price_in_usd,
            status: defaults.status.clone(),
        }
    }
}
