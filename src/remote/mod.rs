// ABOUTME: Remote function client: capability traits and the AWS Lambda backend.
// ABOUTME: Client handles are built fresh from merged connection options.

mod error;
mod lambda;
mod options;
pub mod traits;

pub use error::{RemoteError, RemoteErrorKind};
pub use lambda::LambdaRemote;
pub use options::ClientOptions;
pub use traits::*;
