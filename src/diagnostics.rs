// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn artifact_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ArtifactCleanup,
            message: message.into(),
        }
    }

    pub fn configuration_skipped(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ConfigurationSkipped,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The local artifact could not be deleted.
    ArtifactCleanup,
    /// Handler or runtime were set but no field triggered a configuration update.
    ConfigurationSkipped,
}
