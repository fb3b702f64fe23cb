// ABOUTME: Request and observation types shared by the remote traits.
// ABOUTME: Function settings, lifecycle state, and event-source mapping shapes.

use crate::types::{FunctionName, LayerArn, MappingId, QueueArn, RoleArn};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Function observation
// =============================================================================

/// Lifecycle state reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Pending,
    Active,
    Failed,
    Inactive,
}

impl LifecycleState {
    /// Parse the provider's spelling. Unrecognised values are treated as
    /// `Pending` so the poller keeps waiting rather than guessing.
    pub fn from_provider(value: &str) -> Self {
        match value {
            "Active" => LifecycleState::Active,
            "Failed" => LifecycleState::Failed,
            "Inactive" => LifecycleState::Inactive,
            _ => LifecycleState::Pending,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Pending => "Pending",
            LifecycleState::Active => "Active",
            LifecycleState::Failed => "Failed",
            LifecycleState::Inactive => "Inactive",
        };
        f.write_str(s)
    }
}

/// Outcome of the most recent code or configuration update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LastUpdateStatus {
    Successful,
    Failed,
    InProgress,
}

impl LastUpdateStatus {
    pub fn from_provider(value: &str) -> Self {
        match value {
            "Successful" => LastUpdateStatus::Successful,
            "Failed" => LastUpdateStatus::Failed,
            _ => LastUpdateStatus::InProgress,
        }
    }
}

impl fmt::Display for LastUpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LastUpdateStatus::Successful => "Successful",
            LastUpdateStatus::Failed => "Failed",
            LastUpdateStatus::InProgress => "InProgress",
        };
        f.write_str(s)
    }
}

/// Snapshot of a function as observed by one `get_function` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionState {
    pub state: LifecycleState,
    pub last_update: LastUpdateStatus,
    /// Provider explanation attached to a failed update, if any.
    pub last_update_reason: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl FunctionState {
    pub fn new(state: LifecycleState, last_update: LastUpdateStatus) -> Self {
        Self {
            state,
            last_update,
            last_update_reason: None,
            last_modified: None,
        }
    }

    /// Parse the provider's timestamp format (`2024-05-01T12:30:00.000+0000`).
    pub fn parse_last_modified(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z")
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// The function finished applying its previous update and accepts a new one.
    pub fn is_ready(&self) -> bool {
        self.state == LifecycleState::Active && self.last_update == LastUpdateStatus::Successful
    }

    pub fn update_failed(&self) -> bool {
        self.last_update == LastUpdateStatus::Failed
    }
}

// =============================================================================
// Function requests
// =============================================================================

/// Configuration fields shared by the create and update-configuration calls.
/// Every field is already defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSettings {
    pub handler: String,
    pub runtime: String,
    pub description: String,
    /// Seconds.
    pub timeout: u32,
    /// Megabytes.
    pub memory: u32,
    pub environment: BTreeMap<String, String>,
    pub layers: Vec<LayerArn>,
}

/// Request to create a new function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: FunctionName,
    pub role: RoleArn,
    pub code: Bytes,
    pub settings: FunctionSettings,
}

/// Request to replace the configuration of an existing function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationUpdate {
    pub name: FunctionName,
    pub settings: FunctionSettings,
}

// =============================================================================
// Event-source mappings
// =============================================================================

/// Batching settings pushed on every mapping create or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingSettings {
    pub batch_size: u32,
    /// Maximum batching window in seconds.
    pub batching_window: u32,
    pub enabled: bool,
}

/// An event-source mapping as observed on the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerMapping {
    pub id: MappingId,
    pub queue: QueueArn,
    pub settings: MappingSettings,
}
