// ABOUTME: Command module aggregator for the lamsync CLI.
// ABOUTME: Re-exports deploy, package, and status handlers plus config loading.

mod deploy;
mod package;
mod status;

pub use deploy::deploy;
pub use package::package;
pub use status::status;

use lamsync::config::DeploymentConfig;
use lamsync::error::Result;
use std::path::Path;

/// Discover the config in `dir`, applying the named destination if any.
pub fn load_config(dir: &Path, destination: Option<&str>) -> Result<DeploymentConfig> {
    let config = DeploymentConfig::discover(dir)?;
    match destination {
        Some(name) => config.for_destination(name),
        None => Ok(config),
    }
}
