//! Per-item outcomes and batch summaries.

use stonecat_core::RecordId;

use crate::error::ItemError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Media,
    Products,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Media => write!(f, "media"),
            EntityKind::Products => write!(f, "products"),
        }
    }
}

#[derive(Debug)]
pub enum ItemOutcome {
    Created { id: RecordId },
    Skipped { reason: String },
    Failed { error: ItemError },
}

/// Result of one file or catalog row. `key` identifies the item well enough
/// to retry it by hand (file name, or product name plus catalog line).
#[derive(Debug)]
pub struct ItemReport {
    pub key: String,
    pub outcome: ItemOutcome,
    pub warnings: Vec<String>,
}

impl ItemReport {
    pub(crate) fn new(key: impl Into<String>, outcome: ItemOutcome) -> Self {
        Self {
            key: key.into(),
            outcome,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn skipped(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            key,
            ItemOutcome::Skipped {
                reason: reason.into(),
            },
        )
    }

    pub(crate) fn failed(key: impl Into<String>, error: ItemError) -> Self {
        Self::new(key, ItemOutcome::Failed { error })
    }

    pub(crate) fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Ordered item results of one uploader or importer run.
#[derive(Debug)]
pub struct Report {
    pub kind: EntityKind,
    pub items: Vec<ItemReport>,
}

impl Report {
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, item: ItemReport) {
        self.items.push(item);
    }

    #[must_use]
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Created { .. }))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Failed items in processing order, for the retry list.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ItemError)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            ItemOutcome::Failed { error } => Some((item.key.as_str(), error)),
            _ => None,
        })
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary {
            kind: self.kind,
            created: self.created(),
            skipped: self.skipped(),
            failed: self.failed(),
        }
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub kind: EntityKind,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} created, {} skipped, {} failed",
            self.kind, self.created, self.skipped, self.failed
        )
    }
}
