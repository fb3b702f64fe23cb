// ABOUTME: Package command implementation.
// ABOUTME: Runs the artifact builder alone and keeps the archive.

use lamsync::config::DeploymentConfig;
use lamsync::error::Result;
use lamsync::output::Output;
use lamsync::package::{ArtifactBuilder, ZipBuilder};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct PackageSummary {
    path: PathBuf,
    entries: usize,
    bytes: usize,
}

/// Build the archive and write it to `dest` (default `<function>.zip`).
pub async fn package(
    config: DeploymentConfig,
    dest: Option<PathBuf>,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let dest = dest.unwrap_or_else(|| PathBuf::from(format!("{}.zip", config.function)));

    output.progress(&format!("Packaging {}...", config.source.display()));
    let artifact = ZipBuilder::for_config(&config)
        .build(&config.source, &config.include)
        .await?;

    let summary = PackageSummary {
        entries: artifact.entries(),
        bytes: artifact.size(),
        path: artifact.persist(&dest)?,
    };

    output.report(
        &format!(
            "Wrote {} ({} files, {} bytes)",
            summary.path.display(),
            summary.entries,
            summary.bytes
        ),
        Some(&summary),
    );
    Ok(())
}
