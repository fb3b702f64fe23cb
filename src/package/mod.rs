// ABOUTME: Artifact builder: turns a source directory into a deployable zip.
// ABOUTME: Stages included files, installs production dependencies, and archives.

mod artifact;
mod builder;
mod error;
mod install;

pub use artifact::Artifact;
pub use builder::{ArtifactBuilder, ZipBuilder};
pub use error::PackageError;
pub use install::DependencyInstaller;
