// ABOUTME: Read-only snapshot of a deployed function and its queue triggers.
// ABOUTME: A missing function is reported as not deployed rather than as an error.

use serde::Serialize;

use super::error::DeployError;
use crate::remote::{FunctionOps, FunctionState, MappingOps, TriggerMapping};
use crate::types::FunctionName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionStatus {
    pub function: FunctionName,
    /// `None` when the function does not exist.
    pub remote: Option<FunctionState>,
    pub triggers: Vec<TriggerMapping>,
}

impl FunctionStatus {
    pub fn is_deployed(&self) -> bool {
        self.remote.is_some()
    }
}

/// Query the function and, if it exists, its mappings. Makes no changes.
pub async fn inspect<R>(remote: &R, function: &FunctionName) -> Result<FunctionStatus, DeployError>
where
    R: FunctionOps + MappingOps + ?Sized,
{
    let state = match remote.get_function(function).await {
        Ok(state) => state,
        Err(e) if e.is_not_found() => {
            return Ok(FunctionStatus {
                function: function.clone(),
                remote: None,
                triggers: Vec::new(),
            });
        }
        Err(e) => return Err(DeployError::remote("get function")(e)),
    };

    let triggers = remote
        .list_mappings(function)
        .await
        .map_err(DeployError::remote("list event source mappings"))?;

    Ok(FunctionStatus {
        function: function.clone(),
        remote: Some(state),
        triggers,
    })
}
