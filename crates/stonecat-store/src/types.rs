use serde::{Deserialize, Serialize};
use stonecat_core::RecordId;

/// A document returned by the store: its id plus whatever fields it echoed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// String value of a top-level field, if present and a string.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(serde_json::Value::as_str)
    }
}

/// How a `find_one` filter compares the field with the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Equals,
    /// Case-insensitive substring match.
    Like,
}

impl MatchMode {
    #[must_use]
    pub fn operator(self) -> &'static str {
        match self {
            MatchMode::Equals => "equals",
            MatchMode::Like => "like",
        }
    }
}

/// Response envelope of create endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateEnvelope {
    pub doc: Record,
}

/// Response envelope of find endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct FindEnvelope {
    pub docs: Vec<Record>,
    #[serde(rename = "totalDocs", default)]
    pub total_docs: Option<u64>,
}
