// ABOUTME: Function operations trait for the remote API.
// ABOUTME: Get, create, update code, and update configuration of one function.

use super::shared_types::{ConfigurationUpdate, FunctionSpec, FunctionState};
use crate::remote::RemoteError;
use crate::types::FunctionName;
use async_trait::async_trait;
use bytes::Bytes;

/// Function lifecycle operations.
#[async_trait]
pub trait FunctionOps: Send + Sync {
    /// Fetch the current state of a function.
    ///
    /// Returns `RemoteError::NotFound` when the function does not exist.
    async fn get_function(&self, name: &FunctionName) -> Result<FunctionState, RemoteError>;

    /// Create a function with code and full configuration.
    async fn create_function(&self, spec: &FunctionSpec) -> Result<(), RemoteError>;

    /// Replace the deployed code package.
    async fn update_function_code(
        &self,
        name: &FunctionName,
        code: &Bytes,
    ) -> Result<(), RemoteError>;

    /// Replace the function configuration.
    async fn update_function_configuration(
        &self,
        update: &ConfigurationUpdate,
    ) -> Result<(), RemoteError>;
}
