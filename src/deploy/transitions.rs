// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state, or the previous one with the error.

use crate::diagnostics::{Diagnostics, Warning};
use crate::package::{Artifact, ArtifactBuilder};
use crate::remote::{FunctionOps, MappingOps};

use super::Deployment;
use super::error::DeployError;
use super::reconcile::Reconciler;
use super::retry::RetryPolicy;
use super::state::{Completed, HoldsArtifact, Initialized, Packaged, Reconciled, TriggersSynced};
use super::triggers::TriggerSync;

/// Result type for transitions that hand the deployment back on failure so
/// its artifact can be discarded.
pub type TransitionResult<T, S> = Result<Deployment<T>, (Deployment<S>, DeployError)>;

impl<S> Deployment<S> {
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            config: self.config,
            state,
        }
    }
}

impl<S: HoldsArtifact> Deployment<S> {
    /// Delete the artifact and fall back to the initial state.
    ///
    /// A failed removal is recorded as a warning and does not mask whatever
    /// error led here.
    pub fn discard(self, diag: &mut Diagnostics) -> Deployment<Initialized> {
        remove_artifact(self.state.into_artifact(), diag);
        Deployment {
            config: self.config,
            state: Initialized,
        }
    }
}

fn remove_artifact(artifact: Artifact, diag: &mut Diagnostics) {
    let path = artifact.path().to_path_buf();
    match artifact.remove() {
        Ok(()) => tracing::debug!("Removed artifact {}", path.display()),
        Err(e) => diag.warn(Warning::artifact_cleanup(format!(
            "failed to remove artifact {}: {}",
            path.display(),
            e
        ))),
    }
}

// =============================================================================
// Initialized -> Packaged
// =============================================================================

impl Deployment<Initialized> {
    /// Build the deployment archive.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Packaging` if the builder fails. Nothing is
    /// left on disk in that case.
    #[must_use = "deployment state must be used"]
    pub async fn package<B: ArtifactBuilder + ?Sized>(
        self,
        builder: &B,
    ) -> Result<Deployment<Packaged>, DeployError> {
        let artifact = builder
            .build(&self.config.source, &self.config.include)
            .await?;
        tracing::debug!(
            "Built {} ({} entries, {} bytes)",
            artifact.path().display(),
            artifact.entries(),
            artifact.size()
        );
        Ok(self.transition(Packaged { artifact }))
    }
}

// =============================================================================
// Packaged -> Reconciled
// =============================================================================

impl Deployment<Packaged> {
    /// Create or update the remote function from the artifact.
    ///
    /// # Errors
    ///
    /// Returns `(self, error)` on failure so the artifact can be discarded.
    #[must_use = "deployment state must be used"]
    pub async fn reconcile<R: FunctionOps + ?Sized>(
        self,
        remote: &R,
    ) -> TransitionResult<Reconciled, Packaged> {
        let result = Reconciler::for_config(remote, &self.config)
            .reconcile(&self.config, self.state.artifact.bytes())
            .await;

        match result {
            Ok(outcome) => {
                let Packaged { artifact } = self.state;
                Ok(Deployment {
                    config: self.config,
                    state: Reconciled { artifact, outcome },
                })
            }
            Err(e) => Err((self, e)),
        }
    }
}

// =============================================================================
// Reconciled -> TriggersSynced
// =============================================================================

impl Deployment<Reconciled> {
    /// Bring event-source mappings in line with the configured triggers.
    ///
    /// # Errors
    ///
    /// Returns `(self, error)` on failure so the artifact can be discarded.
    #[must_use = "deployment state must be used"]
    pub async fn sync_triggers<R: MappingOps + ?Sized>(
        self,
        remote: &R,
    ) -> TransitionResult<TriggersSynced, Reconciled> {
        let result = TriggerSync::new(remote, RetryPolicy::from_config(&self.config.retry))
            .sync(&self.config.function, &self.config.triggers)
            .await;

        match result {
            Ok(triggers) => {
                let Reconciled { artifact, outcome } = self.state;
                Ok(Deployment {
                    config: self.config,
                    state: TriggersSynced {
                        artifact,
                        outcome,
                        triggers,
                    },
                })
            }
            Err(e) => Err((self, e)),
        }
    }
}

// =============================================================================
// TriggersSynced -> Completed
// =============================================================================

impl Deployment<TriggersSynced> {
    /// Remove the artifact and finish.
    pub fn finish(self, diag: &mut Diagnostics) -> Deployment<Completed> {
        let TriggersSynced {
            artifact,
            outcome,
            triggers,
        } = self.state;
        remove_artifact(artifact, diag);

        Deployment {
            config: self.config,
            state: Completed { outcome, triggers },
        }
    }
}
