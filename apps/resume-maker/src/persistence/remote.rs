//! Remote publish API client.
//!
//! Two endpoints: `GET /api/public/{slug}` returns `{ "data": Document }` and
//! `POST /api/resumes` upserts a Document, answering `{ "id", "slug" }` or
//! `{ "error" }`. Calls are made once; nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::Document;

/// Shown when the server gives no usable error message.
pub const GENERIC_SAVE_ERROR: &str = "Failed to save";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid remote base URL: {0}")]
    BaseUrl(String),
}

impl RemoteError {
    /// The message the editor shows for a failed save.
    pub fn user_message(&self) -> &str {
        match self {
            RemoteError::Api { message, .. } => message,
            _ => GENERIC_SAVE_ERROR,
        }
    }
}

/// Identity of a published resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub slug: String,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// The Document published under `slug`, or `None` on any failure.
    async fn load_remote(&self, slug: &str) -> Option<Document>;

    /// Creates a record, or updates `existing_id` when given.
    async fn save_remote(
        &self,
        existing_id: Option<&str>,
        doc: &Document,
        title: &str,
    ) -> Result<SaveReceipt, RemoteError>;
}

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    data: &'a Document,
    title: &'a str,
}

#[derive(Debug, Deserialize)]
struct PublicResponse {
    data: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

#[derive(Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: Url,
}

impl RemoteClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let base_url =
            Url::parse(base_url).map_err(|e| RemoteError::BaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::BaseUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl RemoteStore for RemoteClient {
    async fn load_remote(&self, slug: &str) -> Option<Document> {
        let url = match self.endpoint(&["api", "public", slug]) {
            Ok(url) => url,
            Err(e) => {
                warn!(slug, error = %e, "remote load skipped");
                return None;
            }
        };

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(slug, error = %e, "remote load failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(slug, %status, "remote load returned non-success");
            return None;
        }

        match response.json::<PublicResponse>().await {
            Ok(PublicResponse { data: Some(doc) }) => Some(doc),
            Ok(PublicResponse { data: None }) => {
                warn!(slug, "remote load returned no data");
                None
            }
            Err(e) => {
                warn!(slug, error = %e, "remote load body unparseable");
                None
            }
        }
    }

    async fn save_remote(
        &self,
        existing_id: Option<&str>,
        doc: &Document,
        title: &str,
    ) -> Result<SaveReceipt, RemoteError> {
        let body = SaveRequest {
            id: existing_id,
            data: doc,
            title,
        };

        let response = self
            .client
            .post(self.endpoint(&["api", "resumes"])?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| e.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_SAVE_ERROR.to_string());
            warn!(%status, %message, "remote save rejected");
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let receipt: SaveReceipt = serde_json::from_str(&text)?;
        info!(id = %receipt.id, slug = %receipt.slug, "resume published");
        Ok(receipt)
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
