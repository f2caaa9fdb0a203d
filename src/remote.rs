// HTTP client for the hosted document collection service.
// Reads are retried with exponential backoff; writes go out exactly once.

use crate::store::{Document, DocumentStore, Query, StoreError};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub retry_config: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: String::new(),
            timeout_ms: 10_000,
            retry_config: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AddResponse {
    id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct QueryResponse {
    documents: Vec<Document>,
}

pub struct RemoteStore {
    config: ClientConfig,
    base_url: Url,
    http: Client,
}

impl RemoteStore {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::ConfigError("base_url is empty".to_string()));
        }
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| ClientError::ConfigError(format!("invalid base_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::ConfigError(format!(
                "base_url has no path: {}",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            config,
            base_url,
            http,
        })
    }

    // Each segment is percent-encoded, so ids cannot add path or query parts
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn document_url(&self, collection: &str, id: &str) -> String {
        self.endpoint(&["v1", "collections", collection, "documents", id])
            .to_string()
    }

    pub fn collection_url(&self, collection: &str) -> String {
        self.endpoint(&["v1", "collections", collection, "documents"])
            .to_string()
    }

    pub fn query_url(&self, collection: &str) -> String {
        self.endpoint(&["v1", "collections", &format!("{}:query", collection)])
            .to_string()
    }

    fn upsert_url(&self, collection: &str, id: &str) -> String {
        let mut url = self.endpoint(&["v1", "collections", collection, "documents", id]);
        url.query_pairs_mut().append_pair("upsert", "true");
        url.to_string()
    }

    // Helper to calculate exponential backoff with jitter
    pub fn calculate_backoff(retry_attempt: u32, config: &RetryConfig) -> Duration {
        let base_backoff_ms = (config.initial_backoff_ms as f64
            * config.backoff_multiplier.powf(retry_attempt as f64))
        .min(config.max_backoff_ms as f64);

        let jitter = rand::random::<f64>() * config.jitter_factor * base_backoff_ms;
        let backoff_ms = base_backoff_ms * (1.0 - config.jitter_factor / 2.0) + jitter;

        Duration::from_millis(backoff_ms as u64)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        if self.config.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.config.api_key)
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout(self.config.timeout_ms)
            } else {
                StoreError::Backend(e.to_string())
            }
        })
    }

    // Retries only errors that may succeed on a second attempt.
    async fn send_with_retry<F>(&self, build: F) -> Result<Response, StoreError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let retry = &self.config.retry_config;
        let mut attempt = 0;
        loop {
            let outcome = match self.send(build()).await {
                Ok(response) if is_retryable_status(response.status()) => Err(StoreError::Backend(
                    format!("retryable status {}", response.status()),
                )),
                other => other,
            };

            match outcome {
                Err(e) if attempt < retry.max_retries && is_retryable_error(&e) => {
                    let backoff = Self::calculate_backoff(attempt, retry);
                    warn!(
                        "Store read failed ({}), retry {} in {:?}",
                        e,
                        attempt + 1,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn is_retryable_error(error: &StoreError) -> bool {
    matches!(error, StoreError::Timeout(_) | StoreError::Backend(_))
}

async fn error_for_status(
    response: Response,
    collection: &str,
    id: &str,
) -> Result<Response, StoreError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::not_found(collection, id));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Backend(format!("{} - {}", status, body)));
    }
    Ok(response)
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl DocumentStore for RemoteStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let url = self.document_url(collection, id);
        debug!("GET {}", url);
        let response = self
            .send_with_retry(|| self.request(Method::GET, &url))
            .await?;
        match error_for_status(response, collection, id).await {
            Ok(response) => Ok(Some(read_json(response).await?)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let url = self.query_url(collection);
        debug!("POST {} {:?}", url, query);
        let response = self
            .send_with_retry(|| self.request(Method::POST, &url).json(query))
            .await?;
        let response = error_for_status(response, collection, "").await?;
        let body: QueryResponse = read_json(response).await?;
        Ok(body.documents)
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<String, StoreError> {
        let url = self.collection_url(collection);
        debug!("POST {}", url);
        let response = self
            .send(self.request(Method::POST, &url).json(&doc))
            .await?;
        let response = error_for_status(response, collection, "").await?;
        let body: AddResponse = read_json(response).await?;
        Ok(body.id)
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        debug!("PUT {}", url);
        let response = self
            .send(self.request(Method::PUT, &url).json(&doc))
            .await?;
        error_for_status(response, collection, id).await?;
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError> {
        let url = self.upsert_url(collection, id);
        debug!("PATCH {}", url);
        let response = self
            .send(self.request(Method::PATCH, &url).json(&patch))
            .await?;
        error_for_status(response, collection, id).await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        debug!("PATCH {}", url);
        let response = self
            .send(self.request(Method::PATCH, &url).json(&patch))
            .await?;
        error_for_status(response, collection, id).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.document_url(collection, id);
        debug!("DELETE {}", url);
        let response = self.send(self.request(Method::DELETE, &url)).await?;
        error_for_status(response, collection, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            api_key: "test_key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            RemoteStore::new(config("")),
            Err(ClientError::ConfigError(_))
        ));
        assert!(matches!(
            RemoteStore::new(config("not a url")),
            Err(ClientError::ConfigError(_))
        ));
        assert!(matches!(
            RemoteStore::new(config("mailto:store@example.com")),
            Err(ClientError::ConfigError(_))
        ));
    }

    #[test]
    fn test_ids_cannot_escape_their_path_segment() {
        let store = RemoteStore::new(config("https://store.example.com/api")).unwrap();
        assert_eq!(
            store.document_url("pageContent", "a/b?c#d"),
            "https://store.example.com/api/v1/collections/pageContent/documents/a%2Fb%3Fc%23d"
        );
        assert_eq!(
            store.upsert_url("counters", "private tours"),
            "https://store.example.com/api/v1/collections/counters/documents/private%20tours?upsert=true"
        );
    }

    #[test]
    fn test_urls_are_built_from_collection_and_id() {
        let store = RemoteStore::new(config("https://store.example.com/")).unwrap();
        assert_eq!(
            store.document_url("whaleWatchingPage", "content"),
            "https://store.example.com/v1/collections/whaleWatchingPage/documents/content"
        );
        assert_eq!(
            store.collection_url("trainBookings"),
            "https://store.example.com/v1/collections/trainBookings/documents"
        );
        assert_eq!(
            store.query_url("trainRoutes"),
            "https://store.example.com/v1/collections/trainRoutes:query"
        );
    }

    #[test]
    fn test_backoff_grows_and_is_capped() {
        let retry = RetryConfig {
            jitter_factor: 0.0,
            ..Default::default()
        };
        assert_eq!(RemoteStore::calculate_backoff(0, &retry), Duration::from_millis(100));
        assert_eq!(RemoteStore::calculate_backoff(2, &retry), Duration::from_millis(400));
        assert_eq!(
            RemoteStore::calculate_backoff(20, &retry),
            Duration::from_millis(10000)
        );
    }

    #[test]
    fn test_backoff_jitter_stays_within_bounds() {
        let retry = RetryConfig::default();
        for _ in 0..100 {
            let backoff = RemoteStore::calculate_backoff(1, &retry).as_millis() as u64;
            assert!((190..=210).contains(&backoff), "backoff out of range: {}", backoff);
        }
    }

    #[test]
    fn test_retry_classification() {
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(is_retryable_error(&StoreError::Timeout(100)));
        assert!(!is_retryable_error(&StoreError::not_found("a", "b")));
    }

    #[tokio::test]
    async fn test_unreachable_backend_surfaces_error() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.timeout_ms = 500;
        cfg.retry_config.max_retries = 0;
        let store = RemoteStore::new(cfg).unwrap();
        let result = store.get("pageContent", "home").await;
        assert!(matches!(
            result,
            Err(StoreError::Backend(_)) | Err(StoreError::Timeout(_))
        ));
    }
}
