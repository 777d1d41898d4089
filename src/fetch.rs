use crate::error::ScrapeError;
use tokio::{
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::debug;

/// The http boundary of the scraper. Anything non-2xx or transport-level
/// surfaces as [`ScrapeError::Fetch`]; retry policy does not live here.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// `reqwest`-backed fetcher with a minimum interval between consecutive
/// requests, so repeated listing/detail fetches stay polite to the source.
pub struct HttpFetcher {
    client: reqwest::Client,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpFetcher {
    pub fn new(request_delay: Duration) -> HttpFetcher {
        HttpFetcher {
            client: reqwest::Client::new(),
            request_delay,
            last_request: Mutex::new(None),
        }
    }

    async fn wait_for_slot(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = last_request.take() {
            let elapsed = last.elapsed();
            if elapsed < self.request_delay {
                tokio::time::sleep(self.request_delay - elapsed).await;
            }
        }
        last_request.replace(Instant::now());
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.wait_for_slot().await;

        debug!("Visit {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ScrapeError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        response.text().await.map_err(|e| ScrapeError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    #[tokio::test(start_paused = true)]
    async fn second_request_waits_out_the_interval() {
        let fetcher = HttpFetcher::new(DELAY);
        let start = Instant::now();

        fetcher.wait_for_slot().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        fetcher.wait_for_slot().await;
        assert!(start.elapsed() >= DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn no_extra_wait_when_the_interval_already_passed() {
        let fetcher = HttpFetcher::new(DELAY);
        fetcher.wait_for_slot().await;

        tokio::time::sleep(DELAY * 2).await;

        let start = Instant::now();
        fetcher.wait_for_slot().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
