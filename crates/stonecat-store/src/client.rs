//! HTTP client for the content store's collection REST API.
//!
//! Wraps `reqwest` with credential handling, status classification and
//! bounded retry. Three capabilities are exposed: create a record, create a
//! record with an uploaded file, and look up one record by field.

use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::Serialize;

use crate::error::StoreError;
use crate::retry::retry_with_backoff;
use crate::types::{CreateEnvelope, FindEnvelope, MatchMode, Record};

/// Connection and retry settings for [`StoreClient`].
#[derive(Clone)]
pub struct StoreClientOptions {
    /// API root, e.g. `http://localhost:3000/api`.
    pub base_url: String,
    pub token: String,
    /// Scheme word of the `Authorization` header (`JWT`, `Bearer`, ...).
    pub auth_scheme: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl StoreClientOptions {
    #[must_use]
    pub fn from_app_config(config: &stonecat_core::AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.api_token.clone(),
            auth_scheme: config.auth_scheme.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl std::fmt::Debug for StoreClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClientOptions")
            .field("base_url", &self.base_url)
            .field("token", &"[redacted]")
            .field("auth_scheme", &self.auth_scheme)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish()
    }
}

/// Client for a collection-based content store.
///
/// One `reqwest::Client` (and its connection pool) is reused for every call.
/// The credential is fixed at construction; an expired token surfaces as
/// [`StoreError::Auth`].
pub struct StoreClient {
    client: Client,
    base_url: Url,
    authorization: HeaderValue,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl StoreClient {
    /// Builds a client from validated options.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidBaseUrl`] if `base_url` is not an absolute URL.
    /// - [`StoreError::InvalidCredential`] if the header value cannot be built.
    /// - [`StoreError::Transport`] if the underlying `reqwest::Client` cannot
    ///   be constructed.
    pub fn new(options: &StoreClientOptions) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // `Url::join` appends the collection instead of replacing the last
        // path segment.
        let normalised = format!("{}/", options.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StoreError::InvalidBaseUrl {
            base_url: options.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidBaseUrl {
                base_url: options.base_url.clone(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        let mut authorization =
            HeaderValue::from_str(&format!("{} {}", options.auth_scheme, options.token))
                .map_err(|e| StoreError::InvalidCredential(e.to_string()))?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            base_url,
            authorization,
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    /// Creates a record in `collection` from a JSON payload.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Auth`], [`StoreError::Validation`], [`StoreError::Server`]
    ///   or [`StoreError::RateLimited`] on a non-2xx answer (the latter two
    ///   only after retries are exhausted).
    /// - [`StoreError::Transport`] on network failure.
    /// - [`StoreError::Deserialize`] if the answer lacks a `doc` with an `id`.
    pub async fn create<P>(&self, collection: &str, payload: &P) -> Result<Record, StoreError>
    where
        P: Serialize + ?Sized,
    {
        let url = self.collection_url(collection)?;
        let body = serde_json::to_vec(payload).map_err(|e| StoreError::Encode {
            context: format!("{collection} payload"),
            source: e,
        })?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let body = body.clone();
            async move {
                let response = self
                    .client
                    .post(url)
                    .header(AUTHORIZATION, self.authorization.clone())
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .send()
                    .await?;
                let text = Self::success_body(response).await?;
                Self::parse_created(collection, &text)
            }
        })
        .await
    }

    /// Creates a record in `collection` by uploading a file.
    ///
    /// Sends one multipart request: the file under `file` and `metadata`
    /// serialized as JSON under `_payload`.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::create`].
    pub async fn create_with_file<M>(
        &self,
        collection: &str,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
        metadata: &M,
    ) -> Result<Record, StoreError>
    where
        M: Serialize + ?Sized,
    {
        let url = self.collection_url(collection)?;
        let metadata = serde_json::to_string(metadata).map_err(|e| StoreError::Encode {
            context: format!("{collection} metadata"),
            source: e,
        })?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let bytes = bytes.clone();
            let metadata = metadata.clone();
            async move {
                // A multipart form is consumed by the request, so every
                // attempt builds a fresh one.
                let part = Part::bytes(bytes)
                    .file_name(filename.to_owned())
                    .mime_str(content_type)?;
                let form = Form::new().part("file", part).text("_payload", metadata);

                let response = self
                    .client
                    .post(url)
                    .header(AUTHORIZATION, self.authorization.clone())
                    .multipart(form)
                    .send()
                    .await?;
                let text = Self::success_body(response).await?;
                Self::parse_created(collection, &text)
            }
        })
        .await
    }

    /// Returns the first record of `collection` whose `field` matches `value`.
    ///
    /// Zero matches is `Ok(None)`. When the store reports several matches a
    /// warning is logged and the first one is returned.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Auth`] and the other status errors on a non-2xx answer.
    /// - [`StoreError::Transport`] on network failure.
    /// - [`StoreError::Deserialize`] if the answer lacks a `docs` array.
    pub async fn find_one(
        &self,
        collection: &str,
        field: &str,
        mode: MatchMode,
        value: &str,
    ) -> Result<Option<Record>, StoreError> {
        let url = self.find_url(collection, field, mode, value)?;

        let envelope = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url)
                    .header(AUTHORIZATION, self.authorization.clone())
                    .send()
                    .await?;
                let text = Self::success_body(response).await?;
                serde_json::from_str::<FindEnvelope>(&text).map_err(|e| StoreError::Deserialize {
                    context: format!("find in {collection}"),
                    source: e,
                })
            }
        })
        .await?;

        if let Some(matches) = envelope.total_docs.filter(|n| *n > 1) {
            tracing::warn!(
                collection,
                field,
                value,
                matches,
                operator = mode.operator(),
                "lookup is ambiguous, using the first match"
            );
        }

        Ok(envelope.docs.into_iter().next())
    }

    /// `{base}/{collection}`.
    fn collection_url(&self, collection: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(collection.trim_matches('/'))
            .map_err(|e| StoreError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot append collection '{collection}': {e}"),
            })
    }

    /// `{base}/{collection}?where[field][op]=value&limit=1&depth=0`, with all
    /// values percent-encoded.
    fn find_url(
        &self,
        collection: &str,
        field: &str,
        mode: MatchMode,
        value: &str,
    ) -> Result<Url, StoreError> {
        let mut url = self.collection_url(collection)?;
        url.query_pairs_mut()
            .append_pair(&format!("where[{field}][{}]", mode.operator()), value)
            .append_pair("limit", "1")
            .append_pair("depth", "0");
        Ok(url)
    }

    /// Returns the body of a 2xx response, or the classified error for any
    /// other status.
    async fn success_body(response: Response) -> Result<String, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.text().await?);
        }

        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        // The body is only diagnostic here; a failed read leaves it empty.
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::from_status(
            status.as_u16(),
            retry_after_secs,
            &body,
        ))
    }

    fn parse_created(collection: &str, text: &str) -> Result<Record, StoreError> {
        serde_json::from_str::<CreateEnvelope>(text)
            .map(|envelope| envelope.doc)
            .map_err(|e| StoreError::Deserialize {
                context: format!("create in {collection}"),
                source: e,
            })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
