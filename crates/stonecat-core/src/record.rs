use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote store.
///
/// SQL-backed stores hand out integers while document stores use strings; the
/// id is echoed back with the same JSON type it arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}
