// ABOUTME: Validated function names and type-safe provider identifiers.
// ABOUTME: Phantom types keep mapping IDs, queue ARNs, role ARNs, and layer ARNs apart.

mod function_name;
mod id;

pub use function_name::{FunctionName, FunctionNameError};
pub use id::{LayerArn, MappingId, QueueArn, RoleArn};
