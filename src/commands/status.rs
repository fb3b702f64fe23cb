// ABOUTME: Status command implementation.
// ABOUTME: Shows remote lifecycle state and current queue triggers; read-only.

use lamsync::config::DeploymentConfig;
use lamsync::deploy::inspect;
use lamsync::error::Result;
use lamsync::output::Output;
use lamsync::remote::ClientOptions;

pub async fn status(config: DeploymentConfig, defaults: ClientOptions, output: Output) -> Result<()> {
    let remote = defaults.merged_with(&config.client_options()).connect().await;
    let status = inspect(&remote, &config.function).await?;

    let Some(state) = &status.remote else {
        output.report(&format!("{}: not deployed", status.function), Some(&status));
        return Ok(());
    };

    output.progress(&format!("Function: {}", status.function));
    output.progress(&format!("State: {}", state.state));
    output.progress(&format!("Last update: {}", state.last_update));
    if let Some(modified) = state.last_modified {
        output.progress(&format!(
            "Last modified: {}",
            modified.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    if let Some(reason) = &state.last_update_reason {
        output.progress(&format!("Reason: {}", reason));
    }

    if status.triggers.is_empty() {
        output.progress("Triggers: none");
    } else {
        output.progress("Triggers:");
        for mapping in &status.triggers {
            output.progress(&format!(
                "  {} (batch {}, window {}s, {}) [{}]",
                mapping.queue,
                mapping.settings.batch_size,
                mapping.settings.batching_window,
                if mapping.settings.enabled { "enabled" } else { "disabled" },
                mapping.id
            ));
        }
    }

    output.report(
        &format!(
            "{}: {} ({} trigger(s))",
            status.function,
            state.state,
            status.triggers.len()
        ),
        Some(&status),
    );
    Ok(())
}
