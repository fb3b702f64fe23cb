// ABOUTME: Function environment values with process-environment interpolation.
// ABOUTME: Accepts plain scalars or references to variables resolved at deploy time.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One environment variable value as written in the config file.
///
/// ```yaml
/// environment:
///   STAGE: production
///   RETRIES: 3
///   VERBOSE: false
///   API_KEY: { from_env: ORDERS_API_KEY }
///   REGION: { from_env: AWS_REGION, default: us-east-1 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    FromEnv {
        from_env: String,
        #[serde(default)]
        default: Option<String>,
    },
    Literal(String),
    Flag(bool),
    Number(serde_yaml::Number),
}

impl EnvValue {
    /// Produce the string the function will see.
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::Flag(b) => Ok(b.to_string()),
            EnvValue::Number(n) => Ok(n.to_string()),
            EnvValue::FromEnv { from_env, default } => std::env::var(from_env)
                .ok()
                .or_else(|| default.clone())
                .ok_or_else(|| Error::MissingEnvVar(from_env.clone())),
        }
    }
}

pub fn resolve_env_map(map: &BTreeMap<String, EnvValue>) -> Result<BTreeMap<String, String>> {
    map.iter()
        .map(|(k, v)| v.resolve().map(|resolved| (k.clone(), resolved)))
        .collect()
}
