/*
 * A reference tree walker over a workspace directory. It turns every visited
 * filesystem entry into a `ResourceProxy`, asks the `SearchScope` whether it is a
 * member, prunes containers the scope rejects and collects member files. Two
 * strategies are provided: a single-threaded walk built on `walkdir` and a
 * multi-threaded walk built on the `ignore` crate's parallel walker, where every
 * worker thread gets its own matcher cache. Ignore files (.gitignore and
 * friends) are deliberately not consulted; only scope rules decide membership.
 */
use super::derived_markers::DerivedMarkers;
use super::resource_path::{ResourceKind, ResourcePath, ResourceProxy};
use super::search_scope::SearchScope;
use super::worker_matcher::WorkerMatcherCache;
use ignore::{DirEntry, WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("Parallel walk error: {0}")]
    Ignore(#[from] ignore::Error),
    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, WalkError>;

pub struct ScopeWalker {
    workspace_dir: PathBuf,
    derived_markers: DerivedMarkers,
}

impl ScopeWalker {
    pub fn new(workspace_dir: &Path, derived_markers: DerivedMarkers) -> Self {
        ScopeWalker {
            workspace_dir: workspace_dir.to_path_buf(),
            derived_markers,
        }
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    pub fn resource_path(&self, path: &Path) -> Option<ResourcePath> {
        path.strip_prefix(&self.workspace_dir)
            .ok()
            .map(ResourcePath::from_relative)
    }

    pub fn filesystem_path(&self, path: &ResourcePath) -> PathBuf {
        path.segments()
            .iter()
            .fold(self.workspace_dir.clone(), |acc, segment| acc.join(segment))
    }

    pub fn proxy_for(&self, path: &Path, is_dir: bool) -> Option<ResourceProxy> {
        let resource_path = self.resource_path(path)?;
        let kind = if is_dir {
            ResourceKind::Container
        } else {
            ResourceKind::File
        };
        let derived = self.derived_markers.is_derived(&resource_path);
        Some(ResourceProxy::new(resource_path, kind, derived))
    }

    fn admits(
        &self,
        scope: &SearchScope,
        path: &Path,
        is_dir: bool,
        cache: &mut WorkerMatcherCache<'_>,
    ) -> bool {
        match self.proxy_for(path, is_dir) {
            Some(proxy) => scope.contains(&proxy, cache),
            None => {
                log::warn!(
                    "ScopeWalker: {path:?} is outside workspace {:?}, skipping.",
                    self.workspace_dir
                );
                false
            }
        }
    }

    fn existing_roots(&self, scope: &SearchScope) -> Vec<PathBuf> {
        scope
            .roots()
            .iter()
            .map(|root| self.filesystem_path(root))
            .filter(|dir| {
                let exists = dir.exists();
                if !exists {
                    log::warn!("ScopeWalker: Root {dir:?} does not exist, skipping.");
                }
                exists
            })
            .collect()
    }

    /*
     * Walks every root on the calling thread. `filter_entry` both drops rejected
     * files and stops descent into rejected containers.
     */
    pub fn walk_sequential(&self, scope: &SearchScope) -> Result<Vec<ResourcePath>> {
        let mut cache = scope.matcher_cache();
        let mut members = Vec::new();

        for root in self.existing_roots(scope) {
            let walker = WalkDir::new(&root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| {
                    self.admits(scope, entry.path(), entry.file_type().is_dir(), &mut cache)
                });
            for entry_result in walker {
                let entry = entry_result?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Some(path) = self.resource_path(entry.path()) {
                    members.push(path);
                }
            }
        }

        members.sort();
        log::debug!(
            "ScopeWalker: Sequential walk found {} members under {:?}.",
            members.len(),
            self.workspace_dir
        );
        Ok(members)
    }

    /*
     * Walks all roots with `threads` workers (0 lets the walker pick). The
     * visitor factory runs once per worker thread and creates that worker's
     * matcher cache; rejected containers are skipped rather than descended.
     */
    pub fn walk_parallel(
        &self,
        scope: &SearchScope,
        threads: usize,
    ) -> Result<Vec<ResourcePath>> {
        let roots = self.existing_roots(scope);
        let Some((first, rest)) = roots.split_first() else {
            return Ok(Vec::new());
        };

        let mut builder = WalkBuilder::new(first);
        for root in rest {
            builder.add(root);
        }
        builder
            .standard_filters(false)
            .follow_links(false)
            .threads(threads);

        let (tx, rx) = mpsc::channel::<Result<ResourcePath>>();
        builder.build_parallel().run(|| {
            let tx = tx.clone();
            let mut cache = scope.matcher_cache();
            Box::new(move |entry_result: std::result::Result<DirEntry, ignore::Error>| {
                let entry = match entry_result {
                    Ok(entry) => entry,
                    Err(err) => {
                        let _ = tx.send(Err(err.into()));
                        return WalkState::Continue;
                    }
                };
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                if !self.admits(scope, entry.path(), is_dir, &mut cache) {
                    return WalkState::Skip;
                }
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    if let Some(path) = self.resource_path(entry.path()) {
                        let _ = tx.send(Ok(path));
                    }
                }
                WalkState::Continue
            })
        });
        drop(tx);

        let mut members = rx.into_iter().collect::<Result<Vec<_>>>()?;
        members.sort();
        log::debug!(
            "ScopeWalker: Parallel walk found {} members under {:?}.",
            members.len(),
            self.workspace_dir
        );
        Ok(members)
    }
}
