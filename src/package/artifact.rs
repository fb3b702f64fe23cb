// ABOUTME: Handle to a built deployment archive on local disk.
// ABOUTME: The file is removed explicitly via remove() or, failing that, on drop.

use bytes::Bytes;
use snafu::ResultExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

use super::error::{ArchiveIoSnafu, CleanupSnafu, PackageError};

/// A deployment archive: the temp file it lives in plus its contents.
#[derive(Debug)]
pub struct Artifact {
    path: TempPath,
    bytes: Bytes,
    entries: usize,
}

impl Artifact {
    pub(crate) fn new(path: TempPath, bytes: Bytes, entries: usize) -> Self {
        Self {
            path,
            bytes,
            entries,
        }
    }

    /// Write raw archive bytes to a fresh temp file.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self, PackageError> {
        let bytes = bytes.into();
        let mut file = tempfile::Builder::new()
            .prefix("lamsync-")
            .suffix(".zip")
            .tempfile()
            .context(ArchiveIoSnafu)?;
        file.write_all(&bytes).context(ArchiveIoSnafu)?;

        Ok(Self::new(file.into_temp_path(), bytes, 0))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Number of files in the archive.
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Delete the archive, reporting failure.
    pub fn remove(self) -> Result<(), PackageError> {
        let path = self.path.to_path_buf();
        self.path.close().context(CleanupSnafu { path })
    }

    /// Copy the archive to `dest` and delete the temp file.
    pub fn persist(self, dest: &Path) -> Result<PathBuf, PackageError> {
        std::fs::write(dest, &self.bytes).context(ArchiveIoSnafu)?;
        self.remove()?;
        Ok(dest.to_path_buf())
    }
}
