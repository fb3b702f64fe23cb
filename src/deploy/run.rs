// ABOUTME: One full deployment pass: package, reconcile, sync triggers, clean up.
// ABOUTME: The artifact is removed on every path before the result is returned.

use crate::config::DeploymentConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Output;
use crate::package::ArtifactBuilder;
use crate::remote::{FunctionOps, MappingOps};

use super::deployment::{DeployReport, Deployment};
use super::error::DeployError;
use super::reconcile::ReconcileOutcome;

/// Deploy `config` through `remote`, building the artifact with `builder`.
///
/// Stops at the first failing step. Steps already applied remotely are not
/// undone; the local artifact is removed either way.
///
/// # Errors
///
/// Returns the `DeployError` of the first step that failed.
pub async fn run<B, R>(
    config: DeploymentConfig,
    builder: &B,
    remote: &R,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<DeployReport, DeployError>
where
    B: ArtifactBuilder + ?Sized,
    R: FunctionOps + MappingOps + ?Sized,
{
    let deployment = Deployment::new(config);

    output.progress(&format!("  → Packaging {}...", deployment.function()));
    let deployment = deployment.package(builder).await?;
    output.progress(&format!(
        "  → Built artifact ({} files, {} bytes)",
        deployment.artifact().entries(),
        deployment.artifact().size()
    ));

    output.progress("  → Reconciling function...");
    let deployment = match deployment.reconcile(remote).await {
        Ok(d) => d,
        Err((failed, e)) => {
            failed.discard(diag);
            return Err(e);
        }
    };

    if let ReconcileOutcome::Updated {
        configuration_updated: false,
    } = deployment.state.outcome
    {
        let config = deployment.config();
        if config.handler.is_some() || config.runtime.is_some() {
            diag.warn(Warning::configuration_skipped(format!(
                "handler/runtime for {} not applied: set description, timeout, memory, \
                 environment, or layers to update the configuration",
                config.function
            )));
        }
    }

    output.progress("  → Synchronizing triggers...");
    let deployment = match deployment.sync_triggers(remote).await {
        Ok(d) => d,
        Err((failed, e)) => {
            failed.discard(diag);
            return Err(e);
        }
    };

    output.progress("  → Cleaning up...");
    let report = deployment.finish(diag).report();

    output.progress(&format!(
        "  ✓ Triggers: {} created, {} updated, {} deleted",
        report.triggers.created, report.triggers.updated, report.triggers.deleted
    ));

    Ok(report)
}
