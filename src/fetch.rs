use std::{fmt, future::Future, time::Duration};

use log::warn;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const USER_AGENT: &str = "TerpCord/0.0.1";
pub const TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_ATTEMPTS: usize = 3;

/// What went wrong on a single request.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("GET {url} failed after {attempts} attempt(s)")]
    Exhausted {
        url: String,
        attempts: usize,
        #[source]
        source: AttemptError,
    },
    #[error("GET {url} returned malformed JSON")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    /// Pause between failed attempts. Zero means retry immediately.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            delay: Duration::ZERO,
        }
    }
}

/// The last error seen once a [`RetryPolicy`] ran out of attempts.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: usize,
    pub error: E,
}

/// Runs `operation` until it succeeds or `policy.max_attempts` calls have
/// failed. The operation receives the 1-based attempt number.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, Exhausted<E>>
where
    E: fmt::Display,
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts => {
                warn!("attempt {attempt}/{max_attempts} failed: {error}");
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                attempt += 1;
            }
            Err(error) => {
                return Err(Exhausted {
                    attempts: attempt,
                    error,
                })
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_owned(),
            timeout: TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// GETs with a fixed timeout, an identifying user agent and bounded retries.
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            retry: config.retry,
        })
    }

    /// Fetches `url` and returns the body of the first successful response.
    pub async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        retry(&self.retry, |_| self.attempt(url, query))
            .await
            .map_err(|exhausted| FetchError::Exhausted {
                url: url.to_owned(),
                attempts: exhausted.attempts,
                source: exhausted.error,
            })
    }

    /// Like [`Fetcher::get_text`], decoding the body as JSON. Decoding is not
    /// retried.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let body = self.get_text(url, query).await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_owned(),
            source,
        })
    }

    async fn attempt(&self, url: &str, query: &[(&str, &str)]) -> Result<String, AttemptError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status));
        }

        Ok(response.text().await?)
    }
}
