// ABOUTME: Desired-state configuration for one function, parsed from lamsync.yml.
// ABOUTME: Handles YAML parsing, defaults, env interpolation, and destination merging.

mod deserialize;
mod env_value;
mod init;
mod trigger;
mod tuning;

pub use env_value::{EnvValue, resolve_env_map};
pub use init::init_config;
pub use trigger::{DEFAULT_BATCH_SIZE, DEFAULT_BATCHING_WINDOW, TriggerSpec};
pub use tuning::{RetryConfig, WaitConfig};

use crate::error::{Error, Result};
use crate::remote::{ClientOptions, FunctionSettings};
use crate::types::{FunctionName, LayerArn, RoleArn};
use deserialize::{
    deserialize_function_name, deserialize_function_name_option, deserialize_triggers,
    deserialize_triggers_option,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "lamsync.yml";
pub const CONFIG_FILENAME_ALT: &str = "lamsync.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".lamsync/config.yml";

// One set of defaults for both the create and the update path.
pub const DEFAULT_RUNTIME: &str = "nodejs20.x";
pub const DEFAULT_HANDLER: &str = "index.handler";
pub const DEFAULT_TIMEOUT: u32 = 30;
pub const DEFAULT_MEMORY: u32 = 128;

/// Desired state of the function. Loaded once per run and never mutated
/// while the run is in progress.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    #[serde(deserialize_with = "deserialize_function_name")]
    pub function: FunctionName,

    #[serde(default)]
    pub role: Option<RoleArn>,

    #[serde(default)]
    pub handler: Option<String>,

    #[serde(default)]
    pub runtime: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Seconds.
    #[serde(default)]
    pub timeout: Option<NonZeroU32>,

    /// Megabytes.
    #[serde(default)]
    pub memory: Option<NonZeroU32>,

    #[serde(default)]
    pub environment: Option<BTreeMap<String, EnvValue>>,

    #[serde(default)]
    pub layers: Option<Vec<LayerArn>>,

    #[serde(default = "default_source")]
    pub source: PathBuf,

    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default = "default_install_dependencies")]
    pub install_dependencies: bool,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default, deserialize_with = "deserialize_triggers")]
    pub triggers: Vec<TriggerSpec>,

    #[serde(default)]
    pub wait: WaitConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,
}

/// Named overrides selected with `deploy --destination`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Destination {
    #[serde(default, deserialize_with = "deserialize_function_name_option")]
    pub function: Option<FunctionName>,

    #[serde(default)]
    pub role: Option<RoleArn>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default)]
    pub timeout: Option<NonZeroU32>,

    #[serde(default)]
    pub memory: Option<NonZeroU32>,

    #[serde(default)]
    pub layers: Option<Vec<LayerArn>>,

    #[serde(default)]
    pub environment: BTreeMap<String, EnvValue>,

    #[serde(default, deserialize_with = "deserialize_triggers_option")]
    pub triggers: Option<Vec<TriggerSpec>>,
}

fn default_source() -> PathBuf {
    PathBuf::from(".")
}

fn default_install_dependencies() -> bool {
    true
}

impl DeploymentConfig {
    /// A config naming only the function; everything else defaulted.
    pub fn new(function: FunctionName) -> Self {
        DeploymentConfig {
            function,
            role: None,
            handler: None,
            runtime: None,
            description: None,
            timeout: None,
            memory: None,
            environment: None,
            layers: None,
            source: default_source(),
            include: Vec::new(),
            install_dependencies: default_install_dependencies(),
            region: None,
            profile: None,
            triggers: Vec::new(),
            wait: WaitConfig::default(),
            retry: RetryConfig::default(),
            destinations: HashMap::new(),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    /// Load a config file. A relative `source` is taken relative to the
    /// directory holding the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        if config.source.is_relative()
            && let Some(dir) = path.parent()
        {
            config.source = dir.join(&config.source);
        }

        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_destination(&self, name: &str) -> Result<DeploymentConfig> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref function) = dest.function {
            merged.function = function.clone();
        }
        if dest.role.is_some() {
            merged.role = dest.role.clone();
        }
        if dest.region.is_some() {
            merged.region = dest.region.clone();
        }
        if dest.profile.is_some() {
            merged.profile = dest.profile.clone();
        }
        if dest.timeout.is_some() {
            merged.timeout = dest.timeout;
        }
        if dest.memory.is_some() {
            merged.memory = dest.memory;
        }
        if dest.layers.is_some() {
            merged.layers = dest.layers.clone();
        }

        // Deep merge environment
        if !dest.environment.is_empty() {
            let env = merged.environment.get_or_insert_with(BTreeMap::new);
            for (k, v) in &dest.environment {
                env.insert(k.clone(), v.clone());
            }
        }

        if let Some(ref triggers) = dest.triggers {
            merged.triggers = triggers.clone();
        }

        Ok(merged)
    }

    /// Whether any field that requires a configuration update is set.
    ///
    /// `handler` and `runtime` alone do not count; they are carried along
    /// only when one of these fields triggers the update.
    pub fn has_configuration_changes(&self) -> bool {
        self.layers.is_some()
            || self.environment.is_some()
            || self.timeout.is_some()
            || self.memory.is_some()
            || self.description.is_some()
    }

    pub fn handler(&self) -> &str {
        self.handler.as_deref().unwrap_or(DEFAULT_HANDLER)
    }

    pub fn runtime(&self) -> &str {
        self.runtime.as_deref().unwrap_or(DEFAULT_RUNTIME)
    }

    /// Build the defaulted settings sent on create and on configuration
    /// update, resolving environment references.
    pub fn function_settings(&self) -> Result<FunctionSettings> {
        let environment = match &self.environment {
            Some(env) => resolve_env_map(env)?,
            None => BTreeMap::new(),
        };

        Ok(FunctionSettings {
            handler: self.handler().to_string(),
            runtime: self.runtime().to_string(),
            description: self.description.clone().unwrap_or_default(),
            timeout: self.timeout.map_or(DEFAULT_TIMEOUT, NonZeroU32::get),
            memory: self.memory.map_or(DEFAULT_MEMORY, NonZeroU32::get),
            environment,
            layers: self.layers.clone().unwrap_or_default(),
        })
    }

    /// Connection overrides carried by this config.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::new(self.region.clone(), self.profile.clone())
    }
}
