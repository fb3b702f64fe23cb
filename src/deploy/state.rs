// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: States after packaging own the artifact so it cannot be forgotten.

use crate::package::Artifact;

use super::reconcile::ReconcileOutcome;
use super::triggers::TriggerSummary;

/// Initial state: configuration loaded, nothing built yet.
/// Available actions: `package()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Artifact built on local disk.
/// Available actions: `reconcile()`, `discard()`
#[derive(Debug)]
pub struct Packaged {
    pub(crate) artifact: Artifact,
}

/// Function code and configuration applied.
/// Available actions: `sync_triggers()`, `discard()`
#[derive(Debug)]
pub struct Reconciled {
    pub(crate) artifact: Artifact,
    pub(crate) outcome: ReconcileOutcome,
}

/// Event-source mappings match the configured triggers.
/// Available actions: `finish()`, `discard()`
#[derive(Debug)]
pub struct TriggersSynced {
    pub(crate) artifact: Artifact,
    pub(crate) outcome: ReconcileOutcome,
    pub(crate) triggers: TriggerSummary,
}

/// Deployment finished and the artifact removed.
#[derive(Debug, Clone, Copy)]
pub struct Completed {
    pub(crate) outcome: ReconcileOutcome,
    pub(crate) triggers: TriggerSummary,
}

/// States that still own a local artifact.
pub trait HoldsArtifact {
    fn artifact(&self) -> &Artifact;
    fn into_artifact(self) -> Artifact;
}

impl HoldsArtifact for Packaged {
    fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    fn into_artifact(self) -> Artifact {
        self.artifact
    }
}

impl HoldsArtifact for Reconciled {
    fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    fn into_artifact(self) -> Artifact {
        self.artifact
    }
}

impl HoldsArtifact for TriggersSynced {
    fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    fn into_artifact(self) -> Artifact {
        self.artifact
    }
}
