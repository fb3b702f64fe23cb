// ABOUTME: Deploy command implementation.
// ABOUTME: Builds a client from merged options and runs one deployment pass.

use lamsync::config::DeploymentConfig;
use lamsync::deploy::{self, ReconcileOutcome};
use lamsync::diagnostics::Diagnostics;
use lamsync::error::Result;
use lamsync::output::Output;
use lamsync::package::ZipBuilder;
use lamsync::remote::ClientOptions;

/// Deploy the configured function.
pub async fn deploy(
    config: DeploymentConfig,
    defaults: ClientOptions,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Deploying {} from {}",
        config.function,
        config.source.display()
    ));

    let remote = defaults.merged_with(&config.client_options()).connect().await;
    let builder = ZipBuilder::for_config(&config);

    let report = deploy::run(config, &builder, &remote, &output, &mut diag).await?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    let action = match report.outcome {
        ReconcileOutcome::Created => "created",
        ReconcileOutcome::Updated { .. } => "updated",
    };
    output.report(
        &format!("Deployment complete: {} {}", report.function, action),
        Some(&report),
    );
    Ok(())
}
