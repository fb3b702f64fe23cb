// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports the reconciler, trigger sync, retry and readiness policies, and run().

mod deployment;
mod error;
mod readiness;
mod reconcile;
mod retry;
mod run;
mod state;
mod status;
mod transitions;
mod triggers;

pub use deployment::{DeployReport, Deployment};
pub use error::{DeployError, DeployErrorKind};
pub use readiness::ReadinessPoller;
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use retry::RetryPolicy;
pub use run::run;
pub use state::{Completed, HoldsArtifact, Initialized, Packaged, Reconciled, TriggersSynced};
pub use status::{FunctionStatus, inspect};
pub use transitions::TransitionResult;
pub use triggers::{TriggerAction, TriggerPlan, TriggerSummary, TriggerSync};
