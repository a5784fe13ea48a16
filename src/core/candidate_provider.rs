/*
 * Producers of root candidates. The scope never resolves working sets or
 * classpaths itself; it is handed a `RootCandidateProvider` and reduces whatever
 * that provider yields. Two providers live here: a flat caller-supplied list and
 * a filesystem-backed one that turns paths under a workspace directory into
 * proxies.
 */
use super::derived_markers::DerivedMarkers;
use super::resource_path::{ResourceKind, ResourcePath, ResourceProxy};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Cannot read candidate root {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Candidate root {path:?} is outside the workspace {workspace:?}")]
    OutsideWorkspace { path: PathBuf, workspace: PathBuf },
}

pub type Result<T> = std::result::Result<T, ProviderError>;

pub trait RootCandidateProvider: Send + Sync {
    fn root_candidates(&self) -> Result<Vec<ResourceProxy>>;
}

pub struct ExplicitRootCandidates {
    candidates: Vec<ResourceProxy>,
}

impl ExplicitRootCandidates {
    pub fn new(candidates: Vec<ResourceProxy>) -> Self {
        ExplicitRootCandidates { candidates }
    }
}

impl RootCandidateProvider for ExplicitRootCandidates {
    fn root_candidates(&self) -> Result<Vec<ResourceProxy>> {
        Ok(self.candidates.clone())
    }
}

/*
 * Resolves filesystem paths into root candidates. Relative paths are taken
 * relative to the workspace directory; absolute paths must lie inside it. The
 * kind comes from filesystem metadata and the derived flag from the markers.
 * With no paths configured the workspace itself is the only candidate.
 *
 * Containment is decided lexically, after `.` and `..` are folded away, so
 * `../x` or `src/../../x` can never name something outside the workspace. A
 * relative workspace is made absolute against the current directory before
 * absolute roots are compared with it.
 */
pub struct FileSystemRootCandidates {
    workspace_dir: PathBuf,
    paths: Vec<PathBuf>,
    derived_markers: DerivedMarkers,
}

impl FileSystemRootCandidates {
    pub fn new(
        workspace_dir: &Path,
        paths: Vec<PathBuf>,
        derived_markers: DerivedMarkers,
    ) -> Self {
        FileSystemRootCandidates {
            workspace_dir: workspace_dir.to_path_buf(),
            paths,
            derived_markers,
        }
    }

    fn absolute_workspace(&self) -> Result<PathBuf> {
        let absolute = if self.workspace_dir.is_absolute() {
            self.workspace_dir.clone()
        } else {
            let current = std::env::current_dir().map_err(|source| ProviderError::Io {
                path: self.workspace_dir.clone(),
                source,
            })?;
            current.join(&self.workspace_dir)
        };
        Ok(normalize_lexically(&absolute).unwrap_or(absolute))
    }

    fn proxy_for(&self, workspace: &Path, path: &Path) -> Result<ResourceProxy> {
        let outside = || ProviderError::OutsideWorkspace {
            path: path.to_path_buf(),
            workspace: self.workspace_dir.clone(),
        };
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            workspace.join(path)
        };
        let absolute = normalize_lexically(&joined).ok_or_else(outside)?;
        let relative = absolute.strip_prefix(workspace).map_err(|_| outside())?;
        let metadata = fs::metadata(&absolute).map_err(|source| ProviderError::Io {
            path: absolute.clone(),
            source,
        })?;

        let resource_path = ResourcePath::from_relative(relative);
        let kind = if metadata.is_dir() {
            ResourceKind::Container
        } else {
            ResourceKind::File
        };
        let derived = self.derived_markers.is_derived(&resource_path);
        Ok(ResourceProxy::new(resource_path, kind, derived))
    }
}

// Folds `.` and `..` without touching the filesystem. `None` when a `..` would
// climb above the start of the path.
fn normalize_lexically(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                normalized.pop();
                depth -= 1;
            }
            Component::Normal(part) => {
                normalized.push(part);
                depth += 1;
            }
        }
    }
    Some(normalized)
}

impl RootCandidateProvider for FileSystemRootCandidates {
    fn root_candidates(&self) -> Result<Vec<ResourceProxy>> {
        if self.paths.is_empty() {
            log::debug!(
                "FileSystemRootCandidates: No roots configured, using workspace {:?}",
                self.workspace_dir
            );
            return Ok(vec![ResourceProxy::new(
                ResourcePath::workspace_root(),
                ResourceKind::Container,
                false,
            )]);
        }
        let workspace = self.absolute_workspace()?;
        self.paths
            .iter()
            .map(|path| self.proxy_for(&workspace, path))
            .collect()
    }
}
