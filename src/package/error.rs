// ABOUTME: Packaging error types with SNAFU context selectors.
// ABOUTME: Carries the path or command involved in each failure.

use snafu::Snafu;
use std::path::PathBuf;

/// Failure while building or removing a deployment artifact.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PackageError {
    #[snafu(display("source directory not found: {}", path.display()))]
    SourceNotFound { path: PathBuf },

    #[snafu(display("include must be a relative path inside the source directory: {include}"))]
    InvalidInclude { include: String },

    #[snafu(display("included path does not exist: {}", path.display()))]
    MissingInclude { path: PathBuf },

    #[snafu(display("invalid include pattern `{pattern}`: {source}"))]
    Pattern {
        pattern: String,
        source: ignore::Error,
    },

    #[snafu(display("include pattern `{pattern}` matched no files"))]
    UnmatchedInclude { pattern: String },

    #[snafu(display("failed to stage {}: {source}", path.display()))]
    Stage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to walk {}: {source}", path.display()))]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[snafu(display("failed to write archive: {source}"))]
    Archive { source: zip::result::ZipError },

    #[snafu(display("archive I/O failed: {source}"))]
    ArchiveIo { source: std::io::Error },

    #[snafu(display("failed to run `{command}`: {source}"))]
    InstallSpawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` failed ({status}): {stderr}"))]
    InstallFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[snafu(display("failed to remove artifact {}: {source}", path.display()))]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("packaging task failed: {source}"))]
    Task { source: tokio::task::JoinError },
}
