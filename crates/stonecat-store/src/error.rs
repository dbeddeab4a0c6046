use thiserror::Error;

/// Longest response-body excerpt kept in an error, in characters.
pub const BODY_EXCERPT_CHARS: usize = 300;

/// Errors returned by [`crate::StoreClient`].
///
/// Writes (`create`, `create_with_file`) and queries (`find_one`) share this
/// enum; the failing operation is known to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection failure, timeout or TLS error from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 401 or 403; the configured token is missing, expired or lacks access.
    #[error("authentication rejected (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    /// 429 from the store.
    #[error("rate limited by store (retry after {retry_after_secs:?}s): {body}")]
    RateLimited {
        retry_after_secs: Option<u64>,
        body: String,
    },

    /// Any other 4xx, typically a schema or validation failure.
    #[error("store rejected request (HTTP {status}): {body}")]
    Validation { status: u16, body: String },

    /// 5xx from the store.
    #[error("store server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    /// A non-2xx status outside the 4xx/5xx classes.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {context}: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("invalid credential: {0}")]
    InvalidCredential(String),
}

impl StoreError {
    /// Classifies a non-2xx response.
    pub(crate) fn from_status(status: u16, retry_after_secs: Option<u64>, body: &str) -> Self {
        let body = excerpt(body);
        match status {
            401 | 403 => StoreError::Auth { status, body },
            429 => StoreError::RateLimited {
                retry_after_secs,
                body,
            },
            400..=499 => StoreError::Validation { status, body },
            500..=599 => StoreError::Server { status, body },
            _ => StoreError::UnexpectedStatus { status, body },
        }
    }

    /// HTTP status behind this error, when the store answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Auth { status, .. }
            | StoreError::Validation { status, .. }
            | StoreError::Server { status, .. }
            | StoreError::UnexpectedStatus { status, .. } => Some(*status),
            StoreError::RateLimited { .. } => Some(429),
            StoreError::Transport(e) => e.status().map(|s| s.as_u16()),
            StoreError::Deserialize { .. }
            | StoreError::Encode { .. }
            | StoreError::InvalidBaseUrl { .. }
            | StoreError::InvalidCredential(_) => None,
        }
    }
}

/// Truncates a response body to [`BODY_EXCERPT_CHARS`] characters.
fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    let mut chars = trimmed.char_indices();
    match chars.nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_owned(),
    }
}
