// ABOUTME: Production dependency installation for staged sources.
// ABOUTME: Runs the package manager in the staging directory before archiving.

use snafu::{ResultExt, ensure};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::error::{InstallFailedSnafu, InstallSpawnSnafu, PackageError};

/// Manifest whose presence triggers installation.
pub const MANIFEST: &str = "package.json";
/// Lock file staged next to the manifest when present.
pub const LOCKFILE: &str = "package-lock.json";

/// External command that installs production dependencies in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyInstaller {
    program: String,
    args: Vec<String>,
}

impl Default for DependencyInstaller {
    fn default() -> Self {
        Self::new("npm", ["install", "--omit=dev", "--no-audit", "--no-fund"])
    }
}

impl DependencyInstaller {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Install into `dir` if it holds a manifest. Runs to completion.
    ///
    /// Returns whether an install was performed.
    pub async fn install(&self, dir: &Path) -> Result<bool, PackageError> {
        if !dir.join(MANIFEST).is_file() {
            tracing::debug!("No {} in {}, skipping install", MANIFEST, dir.display());
            return Ok(false);
        }

        let command = self.command_line();
        tracing::info!("Installing production dependencies: {}", command);

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context(InstallSpawnSnafu {
                command: command.clone(),
            })?;

        ensure!(
            output.status.success(),
            InstallFailedSnafu {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        );

        Ok(true)
    }
}
