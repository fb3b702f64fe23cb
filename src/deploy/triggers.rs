// ABOUTME: Trigger synchronizer for queue event-source mappings.
// ABOUTME: Plans create/update/delete against the remote set, then applies the plan in order.

use serde::Serialize;
use std::collections::HashSet;

use super::error::DeployError;
use super::retry::RetryPolicy;
use crate::config::TriggerSpec;
use crate::remote::{MappingOps, MappingSettings, TriggerMapping};
use crate::types::{FunctionName, MappingId, QueueArn};

/// One remote call needed to converge the mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerAction {
    Create {
        queue: QueueArn,
        settings: MappingSettings,
    },
    Update {
        id: MappingId,
        queue: QueueArn,
        settings: MappingSettings,
    },
    Delete {
        id: MappingId,
        queue: QueueArn,
    },
}

impl TriggerAction {
    pub fn queue(&self) -> &QueueArn {
        match self {
            TriggerAction::Create { queue, .. }
            | TriggerAction::Update { queue, .. }
            | TriggerAction::Delete { queue, .. } => queue,
        }
    }
}

/// Counts of applied trigger changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TriggerSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl TriggerSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// Ordered list of actions: creates and updates in configured order, then
/// deletes in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerPlan {
    actions: Vec<TriggerAction>,
}

impl TriggerPlan {
    /// Compare configured triggers with the mappings that exist remotely.
    ///
    /// Matching is by queue only, and every matched mapping is updated
    /// whether or not its settings differ. A remote mapping not claimed by
    /// a configured trigger is deleted, which also removes any extra mapping
    /// found on an already-claimed queue.
    pub fn compute(desired: &[TriggerSpec], existing: &[TriggerMapping]) -> Self {
        let mut actions = Vec::with_capacity(desired.len());
        let mut claimed: HashSet<&MappingId> = HashSet::new();

        for spec in desired {
            let settings = spec.settings();
            let matched = existing
                .iter()
                .find(|m| m.queue == spec.queue && !claimed.contains(&m.id));

            match matched {
                Some(mapping) => {
                    claimed.insert(&mapping.id);
                    actions.push(TriggerAction::Update {
                        id: mapping.id.clone(),
                        queue: spec.queue.clone(),
                        settings,
                    });
                }
                None => actions.push(TriggerAction::Create {
                    queue: spec.queue.clone(),
                    settings,
                }),
            }
        }

        for mapping in existing {
            if !claimed.contains(&mapping.id) {
                actions.push(TriggerAction::Delete {
                    id: mapping.id.clone(),
                    queue: mapping.queue.clone(),
                });
            }
        }

        Self { actions }
    }

    pub fn actions(&self) -> &[TriggerAction] {
        &self.actions
    }

    pub fn summary(&self) -> TriggerSummary {
        self.actions
            .iter()
            .fold(TriggerSummary::default(), |mut summary, action| {
                match action {
                    TriggerAction::Create { .. } => summary.created += 1,
                    TriggerAction::Update { .. } => summary.updated += 1,
                    TriggerAction::Delete { .. } => summary.deleted += 1,
                }
                summary
            })
    }
}

/// Makes the function's remote mappings equal the configured triggers.
pub struct TriggerSync<'a, R: ?Sized> {
    remote: &'a R,
    retry: RetryPolicy,
}

impl<'a, R: MappingOps + ?Sized> TriggerSync<'a, R> {
    pub fn new(remote: &'a R, retry: RetryPolicy) -> Self {
        Self { remote, retry }
    }

    /// Synchronize mappings for `function`.
    ///
    /// An empty trigger list leaves existing mappings untouched and issues
    /// no remote calls.
    pub async fn sync(
        &self,
        function: &FunctionName,
        desired: &[TriggerSpec],
    ) -> Result<TriggerSummary, DeployError> {
        if desired.is_empty() {
            tracing::debug!("No triggers configured for {}, leaving mappings alone", function);
            return Ok(TriggerSummary::default());
        }

        let existing = self
            .remote
            .list_mappings(function)
            .await
            .map_err(DeployError::remote("list event source mappings"))?;

        let plan = TriggerPlan::compute(desired, &existing);
        for action in plan.actions() {
            self.apply(function, action).await?;
        }

        Ok(plan.summary())
    }

    async fn apply(&self, function: &FunctionName, action: &TriggerAction) -> Result<(), DeployError> {
        match action {
            TriggerAction::Create { queue, settings } => {
                tracing::info!("Creating trigger {} -> {}", queue, function);
                let id = self
                    .retry
                    .run("create event source mapping", || {
                        self.remote.create_mapping(function, queue, settings)
                    })
                    .await?;
                tracing::debug!("Created mapping {} for {}", id, queue);
            }
            TriggerAction::Update {
                id,
                queue,
                settings,
            } => {
                tracing::info!("Updating trigger {} ({})", queue, id);
                self.retry
                    .run("update event source mapping", || {
                        self.remote.update_mapping(id, function, settings)
                    })
                    .await?;
            }
            TriggerAction::Delete { id, queue } => {
                tracing::info!("Deleting trigger {} ({})", queue, id);
                self.retry
                    .run("delete event source mapping", || self.remote.delete_mapping(id))
                    .await?;
            }
        }
        Ok(())
    }
}
