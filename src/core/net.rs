// src/core/net.rs
// Blocking HTTP GET with bounded retry on transient failures.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::consts::{
    BACKOFF_BASE_MS, MAX_ATTEMPTS, REQUEST_TIMEOUT_SECS, RETRY_STATUSES, USER_AGENT,
};
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

pub trait BackoffPolicy {
    /// Delay before retrying after failed attempt `attempt` (1-based).
    fn delay_for_attempt(&self, attempt: usize) -> Duration;
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_backoff_ms: BACKOFF_BASE_MS,
        }
    }
}

impl BackoffPolicy for RetryPolicy {
    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let exp = attempt.saturating_sub(1).min(16) as u32;
        Duration::from_millis(self.base_backoff_ms.saturating_mul(1u64 << exp))
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    RETRY_STATUSES.contains(&status)
}

pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|source| Error::Http { url: s!("<client>"), source })
}

/// GET `url` with `query` and return the body as text.
/// Retries transport errors and 429/5xx gateway statuses; any other
/// non-success status fails immediately.
pub fn get_text(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
    policy: &RetryPolicy,
) -> Result<String> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let err = match client.get(url).query(query).send() {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    return resp
                        .text()
                        .map_err(|source| Error::Http { url: s!(url), source });
                }
                let err = Error::Status { url: s!(url), status: status.as_u16(), attempts: attempt };
                if !is_retryable_status(status.as_u16()) {
                    return Err(err);
                }
                err
            }
            Err(source) => Error::Http { url: s!(url), source },
        };

        if attempt >= attempts {
            loge!("GET {url} gave up after {attempt} attempt(s): {err}");
            return Err(err);
        }
        let delay = policy.delay_for_attempt(attempt);
        logw!("GET {url} attempt {attempt} failed ({err}); retrying in {} ms", delay.as_millis());
        thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_base() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_for_attempt(1), Duration::from_millis(1_000));
        assert_eq!(p.delay_for_attempt(2), Duration::from_millis(2_000));
        assert_eq!(p.delay_for_attempt(4), Duration::from_millis(8_000));
    }

    #[test]
    fn only_rate_limit_and_gateway_statuses_retry() {
        for s in [429, 500, 502, 503, 504] {
            assert!(is_retryable_status(s));
        }
        for s in [400, 403, 404, 501] {
            assert!(!is_retryable_status(s));
        }
    }
}
