// Monitor endpoint client. The endpoint returns the service's full sample
// history as {"data": [...]} on every fetch.

use std::time::Duration;

use crate::models::{Sample, StatusPayload};
use crate::version::{NAME, VERSION};

/// Fetch failures. Transport and HTTP-status failures are worth retrying;
/// a malformed body is not, the endpoint would serve the same document
/// again.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),
}

pub struct MonitorRepo {
    http: reqwest::Client,
    endpoint: String,
    retries: u32,
}

impl MonitorRepo {
    /// Builds the client with a hard timeout so a hung endpoint cannot
    /// stall the poll loop.
    pub fn new(endpoint: &str, timeout_secs: u64, retries: u32) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(format!("{NAME}/{VERSION}"))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            retries,
        })
    }

    /// One GET against the endpoint, decoded into samples.
    pub async fn fetch_samples(&self) -> Result<Vec<Sample>, FetchError> {
        let response = self.http.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await?;
        let payload: StatusPayload =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;
        Ok(payload.data)
    }

    /// Fetch with bounded retry: transport and HTTP-status failures back
    /// off (doubling, starting at 500ms) up to `retries` extra attempts.
    pub async fn fetch_samples_with_retry(&self) -> Result<Vec<Sample>, FetchError> {
        let mut backoff = Duration::from_millis(500);
        let mut attempt: u32 = 0;
        loop {
            match self.fetch_samples().await {
                Ok(samples) => return Ok(samples),
                Err(e @ FetchError::Malformed(_)) => return Err(e),
                Err(e) => {
                    if attempt >= self.retries {
                        return Err(e);
                    }
                    attempt += 1;
                    tracing::debug!(error = %e, attempt, "fetch failed, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }
}
