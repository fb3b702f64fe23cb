// ABOUTME: Generic deployment struct parameterized by state.
// ABOUTME: State types carry the artifact and results for compile-time guarantees.

use serde::Serialize;

use crate::config::DeploymentConfig;
use crate::package::Artifact;
use crate::types::FunctionName;

use super::reconcile::ReconcileOutcome;
use super::state::{Completed, HoldsArtifact, Initialized};
use super::triggers::TriggerSummary;

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (the artifact,
/// the reconcile outcome) so an artifact-holding deployment cannot be
/// dropped into a state that has no way to clean it up.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) config: DeploymentConfig,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(config: DeploymentConfig) -> Self {
        Deployment {
            config,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn function(&self) -> &FunctionName {
        &self.config.function
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }
}

impl<S: HoldsArtifact> Deployment<S> {
    pub fn artifact(&self) -> &Artifact {
        self.state.artifact()
    }
}

/// Summary of a finished deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub function: FunctionName,
    pub outcome: ReconcileOutcome,
    pub triggers: TriggerSummary,
}

impl Deployment<Completed> {
    pub fn report(&self) -> DeployReport {
        DeployReport {
            function: self.config.function.clone(),
            outcome: self.state.outcome,
            triggers: self.state.triggers,
        }
    }
}
