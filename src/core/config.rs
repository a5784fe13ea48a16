/*
 * Scope definition files. A `ScopeConfig` is the serialized form of everything
 * needed to assemble a `SearchScope` against a workspace directory: the root
 * paths, the raw file name patterns, the derived policy and the directory names
 * that mark derived output. Files are JSON and are only ever read; the engine
 * does not persist configuration.
 *
 * The trait-based shape (`ScopeConfigManagerOperations`) lets callers swap the
 * on-disk lookup for an in-memory one in tests.
 */
use super::derived_markers::{DEFAULT_DERIVED_MARKERS, DerivedMarkers};
use super::path_utils;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "scope.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Configuration file {path:?} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Could not determine a configuration directory")]
    NoConfigDirectory,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn default_derived_markers() -> Vec<String> {
    DEFAULT_DERIVED_MARKERS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    // Filesystem paths, relative to the workspace or absolute inside it. Empty
    // means the whole workspace.
    pub roots: Vec<String>,
    pub file_name_patterns: Option<Vec<String>>,
    pub include_derived: bool,
    pub derived_markers: Vec<String>,
    // Worker threads for the parallel walk; 0 lets the walker decide.
    pub threads: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        ScopeConfig {
            roots: Vec::new(),
            file_name_patterns: None,
            include_derived: false,
            derived_markers: default_derived_markers(),
            threads: 0,
        }
    }
}

impl ScopeConfig {
    pub fn root_paths(&self) -> Vec<PathBuf> {
        self.roots.iter().map(PathBuf::from).collect()
    }

    pub fn derived_markers(&self) -> DerivedMarkers {
        DerivedMarkers::new(self.derived_markers.iter().cloned())
    }
}

pub trait ScopeConfigManagerOperations: Send + Sync {
    fn load_config(&self, path: &Path) -> Result<ScopeConfig>;
    fn default_config_path(&self, app_name: &str) -> Option<PathBuf>;

    /*
     * Loads the per-user default scope definition, falling back to
     * `ScopeConfig::default()` when no such file exists.
     */
    fn load_default_config(&self, app_name: &str) -> Result<ScopeConfig> {
        let path = self
            .default_config_path(app_name)
            .ok_or(ConfigError::NoConfigDirectory)?;
        if !path.exists() {
            log::debug!("ScopeConfigManager: No default config at {path:?}, using defaults.");
            return Ok(ScopeConfig::default());
        }
        self.load_config(&path)
    }
}

pub struct CoreScopeConfigManager {}

impl CoreScopeConfigManager {
    pub fn new() -> Self {
        CoreScopeConfigManager {}
    }
}

impl Default for CoreScopeConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeConfigManagerOperations for CoreScopeConfigManager {
    fn load_config(&self, path: &Path) -> Result<ScopeConfig> {
        log::trace!("ScopeConfigManager: Loading scope config from {path:?}");
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ScopeConfig =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!(
            "ScopeConfigManager: Loaded {} roots and {:?} patterns from {path:?}.",
            config.roots.len(),
            config.file_name_patterns
        );
        Ok(config)
    }

    fn default_config_path(&self, app_name: &str) -> Option<PathBuf> {
        path_utils::get_app_config_local_dir(app_name)
            .map(|dir| dir.join(DEFAULT_CONFIG_FILENAME))
    }
}
