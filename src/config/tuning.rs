// ABOUTME: Timing knobs for readiness polling and conflict retries.
// ABOUTME: Durations are written as humantime strings such as "2s" or "5m".

use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

/// How long to wait for the function to settle after a code update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WaitConfig {
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_wait_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            timeout: default_wait_timeout(),
        }
    }
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_wait_timeout() -> Duration {
    Duration::from_secs(300)
}

/// Retry budget for calls rejected because another update is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    #[serde(default = "default_attempts")]
    pub attempts: NonZeroU32,

    /// Wait before the first retry; later retries wait proportionally longer.
    #[serde(default = "default_backoff", with = "humantime_serde")]
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            backoff: default_backoff(),
        }
    }
}

fn default_attempts() -> NonZeroU32 {
    NonZeroU32::new(3).unwrap_or(NonZeroU32::MIN)
}

fn default_backoff() -> Duration {
    Duration::from_secs(1)
}
