// ABOUTME: Composable capability traits for the remote function API.
// ABOUTME: Defines FunctionOps, MappingOps, and the FullRemote umbrella.

mod function;
mod mapping;
mod shared_types;

pub use function::FunctionOps;
pub use mapping::MappingOps;
pub use shared_types::*;

/// Everything the deployment orchestrator needs from a remote backend.
///
/// Automatically implemented for any type that provides both capabilities.
pub trait FullRemote: FunctionOps + MappingOps {}

impl<T: FunctionOps + MappingOps> FullRemote for T {}
