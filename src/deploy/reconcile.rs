// ABOUTME: Reconciliation engine for the remote function's code and configuration.
// ABOUTME: Creates absent functions; updates code, waits for readiness, then configuration.

use bytes::Bytes;
use serde::Serialize;

use super::error::DeployError;
use super::readiness::ReadinessPoller;
use super::retry::RetryPolicy;
use crate::config::DeploymentConfig;
use crate::remote::{ConfigurationUpdate, FunctionOps, FunctionSettings, FunctionSpec};
use crate::types::FunctionName;

/// What reconciliation did to the remote function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// The function did not exist and was created.
    Created,
    /// The function existed; its code was replaced and, when configuration
    /// fields were set, its configuration too.
    Updated { configuration_updated: bool },
}

/// Drives one function towards its desired state.
pub struct Reconciler<'a, R: ?Sized> {
    remote: &'a R,
    retry: RetryPolicy,
    poller: ReadinessPoller,
}

impl<'a, R: FunctionOps + ?Sized> Reconciler<'a, R> {
    pub fn new(remote: &'a R, retry: RetryPolicy, poller: ReadinessPoller) -> Self {
        Self {
            remote,
            retry,
            poller,
        }
    }

    /// Use the retry and wait tuning from `config`.
    pub fn for_config(remote: &'a R, config: &DeploymentConfig) -> Self {
        Self::new(
            remote,
            RetryPolicy::from_config(&config.retry),
            ReadinessPoller::from_config(&config.wait),
        )
    }

    /// Whether the function exists. "Not found" is an answer, not an error.
    pub async fn exists(&self, name: &FunctionName) -> Result<bool, DeployError> {
        match self.remote.get_function(name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(DeployError::remote("get function")(e)),
        }
    }

    /// Make the remote function carry `code` and the configuration in `config`.
    ///
    /// # Errors
    ///
    /// - `DeployError::MissingRole` if the function must be created without a role.
    /// - `DeployError::PreviousUpdateFailed` / `ReadinessTimeout` from the readiness wait.
    /// - `DeployError::RetriesExhausted` if an update keeps conflicting.
    /// - `DeployError::Remote` for any other remote failure.
    pub async fn reconcile(
        &self,
        config: &DeploymentConfig,
        code: &Bytes,
    ) -> Result<ReconcileOutcome, DeployError> {
        if self.exists(&config.function).await? {
            self.update(config, code).await
        } else {
            self.create(config, code).await
        }
    }

    async fn create(
        &self,
        config: &DeploymentConfig,
        code: &Bytes,
    ) -> Result<ReconcileOutcome, DeployError> {
        let role = config
            .role
            .clone()
            .ok_or_else(|| DeployError::MissingRole(config.function.clone()))?;

        let spec = FunctionSpec {
            name: config.function.clone(),
            role,
            code: code.clone(),
            settings: settings(config)?,
        };

        tracing::info!(
            "Creating function {} ({}, {})",
            spec.name,
            spec.settings.runtime,
            spec.settings.handler
        );
        self.remote
            .create_function(&spec)
            .await
            .map_err(DeployError::remote("create function"))?;

        Ok(ReconcileOutcome::Created)
    }

    async fn update(
        &self,
        config: &DeploymentConfig,
        code: &Bytes,
    ) -> Result<ReconcileOutcome, DeployError> {
        let name = &config.function;

        // Resolve before touching the function so a bad config changes nothing.
        let settings = if config.has_configuration_changes() {
            Some(settings(config)?)
        } else {
            None
        };

        tracing::info!("Updating code of {} ({} bytes)", name, code.len());
        self.retry
            .run("update function code", || {
                self.remote.update_function_code(name, code)
            })
            .await?;

        let Some(settings) = settings else {
            tracing::debug!("No configuration fields set for {}, skipping", name);
            return Ok(ReconcileOutcome::Updated {
                configuration_updated: false,
            });
        };

        // A code update leaves the function rejecting configuration changes
        // until it settles.
        self.poller.wait_until_ready(self.remote, name).await?;

        let update = ConfigurationUpdate {
            name: name.clone(),
            settings,
        };
        tracing::info!("Updating configuration of {}", name);
        self.retry
            .run("update function configuration", || {
                self.remote.update_function_configuration(&update)
            })
            .await?;

        Ok(ReconcileOutcome::Updated {
            configuration_updated: true,
        })
    }
}

fn settings(config: &DeploymentConfig) -> Result<FunctionSettings, DeployError> {
    config
        .function_settings()
        .map_err(|e| DeployError::InvalidConfig(e.to_string()))
}
