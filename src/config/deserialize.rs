// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates function names and rejects duplicate trigger queues.

use serde::Deserialize;
use std::collections::HashSet;

use super::TriggerSpec;
use crate::types::FunctionName;

pub fn deserialize_function_name<'de, D>(deserializer: D) -> Result<FunctionName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    FunctionName::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_function_name_option<'de, D>(
    deserializer: D,
) -> Result<Option<FunctionName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| FunctionName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn deserialize_triggers<'de, D>(deserializer: D) -> Result<Vec<TriggerSpec>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let triggers: Vec<TriggerSpec> = Vec::deserialize(deserializer)?;
    check_unique_queues(&triggers).map_err(serde::de::Error::custom)?;
    Ok(triggers)
}

pub fn deserialize_triggers_option<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<TriggerSpec>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<Vec<TriggerSpec>> = Option::deserialize(deserializer)?;
    if let Some(triggers) = &opt {
        check_unique_queues(triggers).map_err(serde::de::Error::custom)?;
    }
    Ok(opt)
}

/// Two triggers on one queue would ask for two mappings of the same queue.
fn check_unique_queues(triggers: &[TriggerSpec]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for trigger in triggers {
        if !seen.insert(trigger.queue.as_str()) {
            return Err(format!("duplicate trigger queue: {}", trigger.queue));
        }
    }
    Ok(())
}
