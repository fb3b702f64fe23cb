// ABOUTME: Zip artifact builder over a staging directory.
// ABOUTME: Copies includes, installs dependencies, and writes a deflate archive.

use async_trait::async_trait;
use bytes::Bytes;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use snafu::{OptionExt, ResultExt, ensure};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::artifact::Artifact;
use super::error::{
    ArchiveIoSnafu, ArchiveSnafu, InvalidIncludeSnafu, MissingIncludeSnafu, PackageError,
    PatternSnafu, SourceNotFoundSnafu, StageSnafu, TaskSnafu, UnmatchedIncludeSnafu, WalkSnafu,
};
use super::install::{DependencyInstaller, LOCKFILE, MANIFEST};
use crate::config::DeploymentConfig;

/// Directories skipped when walking the whole source tree or matching patterns.
const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules"];

/// Produces a deployable archive from a source directory.
#[async_trait]
pub trait ArtifactBuilder: Send + Sync {
    /// Build an archive from `source`, limited to `includes` when non-empty.
    async fn build(&self, source: &Path, includes: &[String]) -> Result<Artifact, PackageError>;
}

/// Builds zip archives, optionally installing production dependencies first.
#[derive(Debug, Clone, Default)]
pub struct ZipBuilder {
    installer: Option<DependencyInstaller>,
}

impl ZipBuilder {
    pub fn new(installer: Option<DependencyInstaller>) -> Self {
        Self { installer }
    }

    pub fn for_config(config: &DeploymentConfig) -> Self {
        let installer = config
            .install_dependencies
            .then(DependencyInstaller::default);
        Self::new(installer)
    }
}

#[async_trait]
impl ArtifactBuilder for ZipBuilder {
    async fn build(&self, source: &Path, includes: &[String]) -> Result<Artifact, PackageError> {
        ensure!(source.is_dir(), SourceNotFoundSnafu { path: source });

        let staging = tempfile::tempdir().context(ArchiveIoSnafu)?;
        let stage_dir = staging.path().to_path_buf();

        let staged = {
            let source = source.to_path_buf();
            let includes = includes.to_vec();
            let stage_dir = stage_dir.clone();
            let with_manifest = self.installer.is_some();
            tokio::task::spawn_blocking(move || {
                stage(&source, &includes, &stage_dir, with_manifest)
            })
            .await
            .context(TaskSnafu)??
        };
        tracing::debug!("Staged {} file(s) from {}", staged, source.display());

        if let Some(installer) = &self.installer {
            installer.install(&stage_dir).await?;
        }

        let artifact = tokio::task::spawn_blocking(move || write_archive(&stage_dir))
            .await
            .context(TaskSnafu)??;

        tracing::info!(
            "Built artifact {} ({} files, {} bytes)",
            artifact.path().display(),
            artifact.entries(),
            artifact.size()
        );

        Ok(artifact)
    }
}

// =============================================================================
// Staging
// =============================================================================

/// Copy the selected files into `dest`. Returns the number of files copied.
fn stage(
    source: &Path,
    includes: &[String],
    dest: &Path,
    with_manifest: bool,
) -> Result<usize, PackageError> {
    let selected = select(source, includes)?;
    for relative in &selected {
        copy_file(&source.join(relative), &dest.join(relative))?;
    }
    let mut copied = selected.len();

    // The installer needs the manifest even when it was not listed.
    if with_manifest {
        for name in [MANIFEST, LOCKFILE] {
            let path = source.join(name);
            let target = dest.join(name);
            if path.is_file() && !target.exists() {
                copy_file(&path, &target)?;
                copied += 1;
            }
        }
    }

    Ok(copied)
}

/// Relative paths of every file `includes` selects under `source`.
///
/// Plain entries name a file or directory that must exist; directories are
/// taken whole. Entries containing `*`, `?` or `[`, or starting with `!`, are
/// gitignore-style patterns matched against the source tree, and each
/// positive pattern must match at least one file.
fn select(source: &Path, includes: &[String]) -> Result<BTreeSet<PathBuf>, PackageError> {
    let mut selected = BTreeSet::new();

    if includes.is_empty() {
        collect_tree(source, source, true, &mut selected)?;
        return Ok(selected);
    }

    let (patterns, paths): (Vec<&str>, Vec<&str>) = includes
        .iter()
        .map(String::as_str)
        .partition(|include| is_pattern(include));

    for include in paths {
        let relative = checked_relative(include)?;
        let path = source.join(relative);
        ensure!(path.exists(), MissingIncludeSnafu { path: &path });

        if path.is_dir() {
            collect_tree(source, &path, false, &mut selected)?;
        } else {
            selected.insert(normalized(relative));
        }
    }

    if !patterns.is_empty() {
        collect_matches(source, &patterns, &mut selected)?;
    }

    Ok(selected)
}

fn is_pattern(include: &str) -> bool {
    include.starts_with('!') || include.contains(['*', '?', '['])
}

/// Reject absolute includes and includes that climb out of the source tree.
fn checked_relative(include: &str) -> Result<&Path, PackageError> {
    let path = Path::new(include);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    ensure!(
        !include.is_empty() && !escapes,
        InvalidIncludeSnafu { include }
    );
    Ok(path)
}

/// Drop `.` components so the same file is only selected once.
fn normalized(relative: &Path) -> PathBuf {
    relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn pattern_matcher(source: &Path, pattern: &str) -> Result<Gitignore, PackageError> {
    let mut builder = GitignoreBuilder::new(source);
    builder
        .add_line(None, pattern)
        .context(PatternSnafu { pattern })?;
    builder.build().context(PatternSnafu { pattern })
}

/// Add every file under `source` matched by `patterns`; later patterns win.
fn collect_matches(
    source: &Path,
    patterns: &[&str],
    selected: &mut BTreeSet<PathBuf>,
) -> Result<(), PackageError> {
    let mut builder = GitignoreBuilder::new(source);
    let mut unmatched = Vec::new();
    for &pattern in patterns {
        let climbs = Path::new(pattern.trim_start_matches('!'))
            .components()
            .any(|c| c == Component::ParentDir);
        ensure!(!climbs, InvalidIncludeSnafu { include: pattern });

        builder
            .add_line(None, pattern)
            .context(PatternSnafu { pattern })?;
        if !pattern.starts_with('!') {
            unmatched.push((pattern, pattern_matcher(source, pattern)?));
        }
    }
    let matcher = builder.build().context(PatternSnafu {
        pattern: patterns.join(" "),
    })?;

    for entry in walk(source, true) {
        let entry = entry.context(WalkSnafu { path: source })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !matcher
            .matched_path_or_any_parents(entry.path(), false)
            .is_ignore()
        {
            continue;
        }
        unmatched.retain(|(_, own)| {
            !own.matched_path_or_any_parents(entry.path(), false)
                .is_ignore()
        });
        selected.insert(relative_to(source, entry.path())?);
    }

    if let Some((pattern, _)) = unmatched.first() {
        return UnmatchedIncludeSnafu { pattern: *pattern }.fail();
    }
    Ok(())
}

/// Add every file under `dir`, as paths relative to `root`.
///
/// With `skip_excluded`, `.git` and `node_modules` below `dir` are not walked.
fn collect_tree(
    root: &Path,
    dir: &Path,
    skip_excluded: bool,
    selected: &mut BTreeSet<PathBuf>,
) -> Result<(), PackageError> {
    for entry in walk(dir, skip_excluded) {
        let entry = entry.context(WalkSnafu { path: dir })?;
        if entry.file_type().is_file() {
            selected.insert(relative_to(root, entry.path())?);
        }
    }
    Ok(())
}

fn walk(
    dir: &Path,
    skip_excluded: bool,
) -> impl Iterator<Item = Result<walkdir::DirEntry, walkdir::Error>> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            !(skip_excluded
                && entry.depth() > 0
                && entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| EXCLUDED_DIRS.contains(&name)))
        })
}

fn relative_to(root: &Path, path: &Path) -> Result<PathBuf, PackageError> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .ok()
        .context(MissingIncludeSnafu { path })
}

fn copy_file(from: &Path, to: &Path) -> Result<(), PackageError> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).context(StageSnafu { path: parent })?;
    }
    std::fs::copy(from, to).context(StageSnafu { path: from })?;
    Ok(())
}

// =============================================================================
// Archiving
// =============================================================================

/// Zip the staging directory into a temp file, entries in sorted path order.
fn write_archive(staging: &Path) -> Result<Artifact, PackageError> {
    let mut file = tempfile::Builder::new()
        .prefix("lamsync-")
        .suffix(".zip")
        .tempfile()
        .context(ArchiveIoSnafu)?;

    let file_options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let dir_options = SimpleFileOptions::default().unix_permissions(0o755);

    let mut entries = 0;
    {
        let mut writer = ZipWriter::new(file.as_file_mut());

        for entry in WalkDir::new(staging).min_depth(1).sort_by_file_name() {
            let entry = entry.context(WalkSnafu { path: staging })?;
            let name = entry_name(staging, entry.path());

            if entry.file_type().is_dir() {
                writer
                    .add_directory(format!("{name}/"), dir_options)
                    .context(ArchiveSnafu)?;
            } else if entry.file_type().is_file() {
                writer.start_file(name, file_options).context(ArchiveSnafu)?;
                let mut input = File::open(entry.path()).context(ArchiveIoSnafu)?;
                std::io::copy(&mut input, &mut writer).context(ArchiveIoSnafu)?;
                entries += 1;
            }
        }

        writer.finish().context(ArchiveSnafu)?;
    }

    let bytes = std::fs::read(file.path()).context(ArchiveIoSnafu)?;
    Ok(Artifact::new(
        file.into_temp_path(),
        Bytes::from(bytes),
        entries,
    ))
}

/// Archive entry names always use forward slashes.
fn entry_name(root: &Path, path: &Path) -> String {
    let relative: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_components_are_rejected() {
        assert!(checked_relative("../secrets").is_err());
        assert!(checked_relative("/etc/passwd").is_err());
        assert!(checked_relative("").is_err());
        assert!(checked_relative("./src/index.js").is_ok());
    }

    #[test]
    fn glob_characters_and_negation_mark_patterns() {
        assert!(is_pattern("*.js"));
        assert!(is_pattern("src/**"));
        assert!(is_pattern("lib/?.js"));
        assert!(is_pattern("!*.test.js"));
        assert!(!is_pattern("src/index.js"));
        assert!(!is_pattern("node_modules"));
    }

    #[test]
    fn overlapping_includes_select_each_file_once() {
        let source = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(source.path().join("src")).unwrap();
        std::fs::write(source.path().join("src/index.js"), "").unwrap();

        let selected = select(
            source.path(),
            &["src".into(), "./src/index.js".into(), "src/*.js".into()],
        )
        .unwrap();

        assert_eq!(selected.len(), 1);
        assert!(selected.contains(Path::new("src/index.js")));
    }

    #[test]
    fn patterns_cannot_climb_out_of_source() {
        let source = tempfile::tempdir().unwrap();
        let err = select(source.path(), &["../*.js".into()]).unwrap_err();
        assert!(matches!(err, PackageError::InvalidInclude { .. }));
    }

    #[test]
    fn entry_names_use_forward_slashes() {
        let root = Path::new("/stage");
        assert_eq!(
            entry_name(root, Path::new("/stage/lib/util.js")),
            "lib/util.js"
        );
    }

    #[test]
    fn stage_copies_manifest_when_installing() {
        let source = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("index.js"), "exports.handler = 1").unwrap();
        std::fs::write(source.path().join("package.json"), "{}").unwrap();
        let dest = tempfile::tempdir().unwrap();

        let copied = stage(source.path(), &["index.js".to_string()], dest.path(), true).unwrap();

        assert_eq!(copied, 2);
        assert!(dest.path().join("package.json").is_file());
    }

    #[test]
    fn whole_tree_skips_vcs_and_dependencies() {
        let source = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(source.path().join(".git")).unwrap();
        std::fs::create_dir_all(source.path().join("node_modules/left-pad")).unwrap();
        std::fs::write(source.path().join(".git/HEAD"), "ref").unwrap();
        std::fs::write(source.path().join("node_modules/left-pad/index.js"), "").unwrap();
        std::fs::write(source.path().join("index.js"), "").unwrap();
        let dest = tempfile::tempdir().unwrap();

        let copied = stage(source.path(), &[], dest.path(), false).unwrap();

        assert_eq!(copied, 1);
        assert!(!dest.path().join(".git").exists());
        assert!(!dest.path().join("node_modules").exists());
    }
}
