// ABOUTME: Readiness poller for functions settling after an update.
// ABOUTME: Waits for Active + Successful, aborts on a failed update, bounded by a timeout.

use std::time::Duration;
use tokio::time::Instant;

use super::error::DeployError;
use crate::config::WaitConfig;
use crate::remote::FunctionOps;
use crate::types::FunctionName;

/// Polls a function until it accepts a new update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPoller {
    interval: Duration,
    timeout: Duration,
}

impl Default for ReadinessPoller {
    fn default() -> Self {
        Self::from_config(&WaitConfig::default())
    }
}

impl ReadinessPoller {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub fn from_config(config: &WaitConfig) -> Self {
        Self::new(config.interval, config.timeout)
    }

    /// Block until `name` reports `Active` with a `Successful` last update.
    ///
    /// Query errors while polling are logged and polling continues; a
    /// `Failed` last-update status aborts immediately.
    ///
    /// # Errors
    ///
    /// - `DeployError::PreviousUpdateFailed` if the last update failed.
    /// - `DeployError::ReadinessTimeout` if the wait bound elapses first.
    pub async fn wait_until_ready<R: FunctionOps + ?Sized>(
        &self,
        remote: &R,
        name: &FunctionName,
    ) -> Result<(), DeployError> {
        let start = Instant::now();

        loop {
            match remote.get_function(name).await {
                Ok(state) if state.is_ready() => {
                    tracing::debug!("{} is ready after {:?}", name, start.elapsed());
                    return Ok(());
                }
                Ok(state) if state.update_failed() => {
                    return Err(DeployError::PreviousUpdateFailed {
                        function: name.clone(),
                        reason: state
                            .last_update_reason
                            .unwrap_or_else(|| "no reason reported".to_string()),
                    });
                }
                Ok(state) => {
                    tracing::debug!(
                        "{} not ready (state: {}, last update: {})",
                        name,
                        state.state,
                        state.last_update
                    );
                }
                Err(e) => {
                    tracing::debug!("Readiness check for {} failed, retrying: {}", name, e);
                }
            }

            if start.elapsed() + self.interval > self.timeout {
                return Err(DeployError::ReadinessTimeout {
                    function: name.clone(),
                    waited_secs: start.elapsed().as_secs(),
                });
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
