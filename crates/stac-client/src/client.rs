//! STAC search client with bounded retry.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use pipeline_common::{BoundingBox, PipelineError, PipelineResult, RetryConfig};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::models::{Item, ItemCollection, SearchBody, SortBy};

/// Client for one STAC API endpoint.
pub struct StacClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl StacClient {
    /// Create a client for `base_url` (with or without a trailing slash).
    pub fn new(base_url: &str, retry: RetryConfig) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PipelineError::CatalogConnection(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// Search for the most recent item over `bbox` within the trailing
    /// `lookback_days` window ending at `now`.
    ///
    /// Returns `Ok(None)` when the window is empty. Transport failures and
    /// 5xx/429 responses are retried with exponential backoff up to the
    /// configured cap; other catalog rejections fail immediately.
    pub async fn search_latest(
        &self,
        collection: &str,
        bbox: &BoundingBox,
        lookback_days: i64,
        limit: usize,
        now: DateTime<Utc>,
    ) -> PipelineResult<Option<Item>> {
        let start = now - chrono::Duration::days(lookback_days);
        let datetime = format!(
            "{}/{}",
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            now.to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        let body = SearchBody {
            collections: vec![collection.to_string()],
            bbox: bbox.to_array(),
            datetime: datetime.clone(),
            sortby: vec![SortBy::datetime_descending()],
            limit,
        };

        info!(
            collection = collection,
            datetime = %datetime,
            limit = limit,
            "Searching STAC catalog"
        );

        let collection = self.search_with_retry(&body).await?;
        debug!(count = collection.features.len(), "Catalog search returned");

        Ok(collection.features.into_iter().next())
    }

    async fn search_with_retry(&self, body: &SearchBody) -> PipelineResult<ItemCollection> {
        let url = format!("{}/search", self.base_url);
        let mut retry_count = 0;
        let mut delay = Duration::from_secs(self.retry.initial_delay_secs);
        let max_delay = Duration::from_secs(self.retry.max_delay_secs);

        loop {
            match self.search_once(&url, body).await {
                Ok(items) => return Ok(items),
                Err(SearchAttemptError::Fatal(msg)) => {
                    return Err(PipelineError::CatalogConnection(msg));
                }
                Err(SearchAttemptError::Retryable(msg)) => {
                    retry_count += 1;
                    if retry_count > self.retry.max_retries {
                        return Err(PipelineError::CatalogConnection(format!(
                            "search failed after {} retries: {}",
                            self.retry.max_retries, msg
                        )));
                    }

                    warn!(
                        error = %msg,
                        retry = retry_count,
                        max_retries = self.retry.max_retries,
                        delay_secs = delay.as_secs(),
                        "Catalog request failed, retrying"
                    );

                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, max_delay);
                }
            }
        }
    }

    async fn search_once(
        &self,
        url: &str,
        body: &SearchBody,
    ) -> Result<ItemCollection, SearchAttemptError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    SearchAttemptError::Retryable(e.to_string())
                } else {
                    SearchAttemptError::Fatal(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let msg = format!("catalog returned HTTP {}", status);
            return if is_retryable_status(status) {
                Err(SearchAttemptError::Retryable(msg))
            } else {
                Err(SearchAttemptError::Fatal(msg))
            };
        }

        response
            .json::<ItemCollection>()
            .await
            .map_err(|e| SearchAttemptError::Fatal(format!("malformed catalog response: {}", e)))
    }
}

/// Classification of one failed search attempt.
enum SearchAttemptError {
    Retryable(String),
    Fatal(String),
}

/// Server-side conditions worth retrying: overload and transient errors.
fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
