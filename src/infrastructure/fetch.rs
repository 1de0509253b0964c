use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use crate::domain::ports::DocumentFetcher;
use crate::domain::DomainError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Plain HTTP document fetcher with a per-request deadline, so a hung
/// host cannot stall an ingestion or QA request indefinitely.
pub struct HttpFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DomainError::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::fetch(url, format!("status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::fetch(url, e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_returns_body_bytes() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/books/algebra.pdf");
                then.status(200).body("%PDF-1.7 data");
            })
            .await;

        let fetcher = HttpFetcher::new();
        let bytes = fetcher
            .fetch(&server.url("/books/algebra.pdf"))
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-1.7 data");
    }

    #[tokio::test]
    async fn test_fetch_maps_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(404);
            })
            .await;

        let fetcher = HttpFetcher::new();
        let err = fetcher.fetch(&server.url("/missing.pdf")).await.unwrap_err();
        assert!(matches!(err, DomainError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_fetch_times_out_on_slow_host() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow.pdf");
                then.status(200)
                    .body("%PDF")
                    .delay(Duration::from_secs(10));
            })
            .await;

        let fetcher = HttpFetcher::new().with_timeout(Duration::from_millis(250));
        let start = std::time::Instant::now();
        let err = fetcher.fetch(&server.url("/slow.pdf")).await.unwrap_err();

        assert!(matches!(err, DomainError::Fetch { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
