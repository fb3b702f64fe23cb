// ABOUTME: Event-source mapping operations trait for the remote API.
// ABOUTME: List, create, update, and delete queue triggers of a function.

use super::shared_types::{MappingSettings, TriggerMapping};
use crate::remote::RemoteError;
use crate::types::{FunctionName, MappingId, QueueArn};
use async_trait::async_trait;

/// Queue trigger operations.
#[async_trait]
pub trait MappingOps: Send + Sync {
    /// List every event-source mapping bound to the function.
    async fn list_mappings(&self, function: &FunctionName)
    -> Result<Vec<TriggerMapping>, RemoteError>;

    /// Bind a queue to the function.
    async fn create_mapping(
        &self,
        function: &FunctionName,
        queue: &QueueArn,
        settings: &MappingSettings,
    ) -> Result<MappingId, RemoteError>;

    /// Overwrite the batching settings of an existing mapping.
    async fn update_mapping(
        &self,
        id: &MappingId,
        function: &FunctionName,
        settings: &MappingSettings,
    ) -> Result<(), RemoteError>;

    /// Remove a mapping.
    async fn delete_mapping(&self, id: &MappingId) -> Result<(), RemoteError>;
}
