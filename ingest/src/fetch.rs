use crate::error::{IngestError, Result};

pub const BASE_URL: &str = "https://www.vlr.gg";

const USER_AGENT: &str = concat!("match-stats-ingest/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);
const MIN_REQUEST_INTERVAL_MS: u64 = 1000;
const MAX_ATTEMPTS: u32 = 5;

pub fn results_page_url(page: u32) -> String {
    format!("{}/matches/results/?page={}", BASE_URL, page)
}

pub fn match_url_from_href(href: &str) -> String {
    format!("{}{}", BASE_URL, href)
}

pub fn event_matches_url(event_id: &str) -> String {
    format!("{}/event/matches/{}/", BASE_URL, event_id)
}

pub fn match_url(match_id: &str) -> String {
    format!("{}/match/{}/", BASE_URL, match_id)
}

/// Enforces a minimum delay between outbound requests.
struct RateLimiter {
    last_request: tokio::sync::Mutex<Option<std::time::Instant>>,
    min_interval: std::time::Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: tokio::sync::Mutex::new(None),
            min_interval: std::time::Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(std::time::Instant::now());
    }
}

pub struct Fetcher {
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IngestError::Config(format!("building http client: {}", e)))?;

        Ok(Self {
            client,
            limiter: RateLimiter::new(MIN_REQUEST_INTERVAL_MS),
        })
    }

    /// Fetch one page, retrying transient failures with randomized backoff.
    /// A non-success status counts as a failed attempt. Once the attempt
    /// budget is spent the last failure is returned as a transport error.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let mut last_failure = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            self.limiter.wait().await;

            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    return response.text().await.map_err(|e| IngestError::Transport {
                        url: url.to_string(),
                        reason: format!("reading body: {}", e),
                    });
                }
                Ok(response) => {
                    last_failure = format!("status {}", response.status());
                }
                Err(e) => {
                    last_failure = e.to_string();
                }
            }

            tracing::warn!(
                "Fetching {} failed (attempt {}/{}): {}",
                url,
                attempt,
                MAX_ATTEMPTS,
                last_failure
            );

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(backoff_delay()).await;
            }
        }

        Err(IngestError::Transport {
            url: url.to_string(),
            reason: format!("giving up after {} attempts: {}", MAX_ATTEMPTS, last_failure),
        })
    }
}

fn backoff_delay() -> std::time::Duration {
    use rand::Rng;

    let jitter: f64 = rand::thread_rng().gen_range(0.0..3.0);
    std::time::Duration::from_secs_f64(2.0 + jitter)
}
