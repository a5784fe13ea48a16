/*
 * The search-scope membership engine. It reduces candidate roots to a minimal,
 * non-overlapping root set (`root_set`), compiles file name globs into inclusion
 * and exclusion matchers (`file_name_patterns`), hands each concurrent worker its
 * own matcher scratch state (`worker_matcher`) and combines all of it into the
 * immutable `SearchScope` whose `contains` predicate drives a tree walk.
 *
 * Around the engine sit its collaborators: root-candidate providers, the
 * derived-directory policy for plain filesystems, a reference walker and the
 * scope definition file loader.
 */
pub mod candidate_provider;
pub mod config;
pub mod derived_markers;
pub mod file_name_patterns;
pub mod path_utils;
pub mod resource_path;
pub mod root_set;
pub mod scope_walker;
pub mod search_scope;
pub mod worker_matcher;

// Re-export path primitives
pub use resource_path::{ResourceKind, ResourcePath, ResourceProxy};

// Re-export engine components
pub use file_name_patterns::{
    CompiledPatternSet, FILE_PATTERN_NEGATOR, IS_CASE_SENSITIVE_FILESYSTEM, PatternSyntaxError,
    compile_patterns,
};
pub use root_set::{RootSet, build_root_set};
pub use search_scope::{ScopeError, SearchScope};
pub use worker_matcher::{FileNameVerdict, WorkerMatcher, WorkerMatcherCache};

// Re-export collaborators
pub use candidate_provider::{
    ExplicitRootCandidates, FileSystemRootCandidates, ProviderError, RootCandidateProvider,
};
pub use config::{ConfigError, CoreScopeConfigManager, ScopeConfig, ScopeConfigManagerOperations};
pub use derived_markers::DerivedMarkers;
pub use scope_walker::{ScopeWalker, WalkError};
