// ABOUTME: Queue trigger declarations.
// ABOUTME: Each entry binds one queue to the function with batching settings.

use crate::remote::MappingSettings;
use crate::types::QueueArn;
use serde::Deserialize;
use std::num::NonZeroU32;

pub const DEFAULT_BATCH_SIZE: u32 = 10;
pub const DEFAULT_BATCHING_WINDOW: u32 = 0;

/// A queue-based event source the function should be subscribed to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TriggerSpec {
    pub queue: QueueArn,

    #[serde(default)]
    pub batch_size: Option<NonZeroU32>,

    /// Maximum batching window in seconds.
    #[serde(default)]
    pub batching_window: Option<u32>,

    #[serde(default)]
    pub enabled: Option<bool>,
}

impl TriggerSpec {
    pub fn new(queue: QueueArn) -> Self {
        Self {
            queue,
            batch_size: None,
            batching_window: None,
            enabled: None,
        }
    }

    /// Settings to push to the provider, with unset fields defaulted.
    pub fn settings(&self) -> MappingSettings {
        MappingSettings {
            batch_size: self.batch_size.map_or(DEFAULT_BATCH_SIZE, NonZeroU32::get),
            batching_window: self.batching_window.unwrap_or(DEFAULT_BATCHING_WINDOW),
            enabled: self.enabled.unwrap_or(true),
        }
    }
}
