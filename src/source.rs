//! JSON-over-HTTP producers for dashboard endpoints.
//!
//! The fetch controller is transport-agnostic; this module is the usual
//! producer behind it: `GET {base_url}{path}` decoded into `T`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ApiConfig;

const MAX_ERROR_BODY: usize = 512;

pub type SourceFuture<T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send>>;

/// Errors a JSON source can fail with.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection failure, timeout, or broken body stream
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Backend answered with a non-2xx status
    #[error("'{url}' returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Body was not the expected JSON
    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Shared HTTP client bound to one backend.
#[derive(Debug, Clone)]
pub struct JsonSource {
    client: Client,
    base_url: String,
}

impl JsonSource {
    pub fn new(api: &ApiConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(api.connect_timeout_seconds))
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()
            .map_err(SourceError::Client)?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| SourceError::Request {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            let mut text = String::from_utf8_lossy(&body).trim().to_string();
            if text.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| text.is_char_boundary(*i))
                    .unwrap_or(0);
                text.truncate(cut);
            }
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_slice(&body).map_err(|source| SourceError::Decode { url, source })
    }

    /// Producer for a [`FetchController`](crate::fetch::FetchController)
    /// that fetches `path` on every call.
    pub fn producer<T>(&self, path: impl Into<String>) -> impl Fn() -> SourceFuture<T> + Send + Sync
    where
        T: DeserializeOwned + Send + 'static,
    {
        let source = self.clone();
        let path = path.into();
        move || -> SourceFuture<T> {
            let source = source.clone();
            let path = path.clone();
            Box::pin(async move { source.get_json::<T>(&path).await })
        }
    }
}
