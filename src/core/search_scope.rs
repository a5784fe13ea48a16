/*
 * The immutable membership engine handed to a tree walker. A `SearchScope` owns
 * its minimal root set, the compiled file name patterns and the derived policy;
 * it is built once per search, shared by reference across all workers, and
 * answers `contains` for every visited resource. The walker reads `roots` to
 * know where to start and treats a `false` answer for a container as "do not
 * descend".
 */
use super::candidate_provider::{ProviderError, RootCandidateProvider};
use super::file_name_patterns::{
    CompiledPatternSet, IS_CASE_SENSITIVE_FILESYSTEM, PatternSyntaxError, compile_patterns,
};
use super::resource_path::{ResourceKind, ResourcePath, ResourceProxy};
use super::root_set::{RootSet, build_root_set};
use super::worker_matcher::{FileNameVerdict, WorkerMatcherCache};

#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error(transparent)]
    Pattern(#[from] PatternSyntaxError),
    #[error("Failed to collect root candidates: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Debug)]
pub struct SearchScope {
    roots: RootSet,
    file_name_patterns: Option<Vec<String>>,
    patterns: CompiledPatternSet,
    include_derived: bool,
}

impl SearchScope {
    /*
     * Builds a scope using the host filesystem's case sensitivity. Patterns are
     * compiled before anything else is assembled, so a malformed pattern leaves
     * no scope behind.
     */
    pub fn new<I>(
        candidates: I,
        file_name_patterns: Option<Vec<String>>,
        include_derived: bool,
    ) -> Result<Self, PatternSyntaxError>
    where
        I: IntoIterator<Item = ResourceProxy>,
    {
        Self::with_case_sensitivity(
            candidates,
            file_name_patterns,
            include_derived,
            IS_CASE_SENSITIVE_FILESYSTEM,
        )
    }

    pub fn with_case_sensitivity<I>(
        candidates: I,
        file_name_patterns: Option<Vec<String>>,
        include_derived: bool,
        case_sensitive: bool,
    ) -> Result<Self, PatternSyntaxError>
    where
        I: IntoIterator<Item = ResourceProxy>,
    {
        let patterns = compile_patterns(file_name_patterns.as_deref(), case_sensitive)?;
        Ok(Self::assemble(
            candidates,
            file_name_patterns,
            patterns,
            include_derived,
        ))
    }

    pub fn from_provider(
        provider: &dyn RootCandidateProvider,
        file_name_patterns: Option<Vec<String>>,
        include_derived: bool,
    ) -> Result<Self, ScopeError> {
        // Compile first: a bad pattern must fail before the provider does any work.
        let patterns =
            compile_patterns(file_name_patterns.as_deref(), IS_CASE_SENSITIVE_FILESYSTEM)?;
        let candidates = provider.root_candidates()?;
        Ok(Self::assemble(
            candidates,
            file_name_patterns,
            patterns,
            include_derived,
        ))
    }

    fn assemble<I>(
        candidates: I,
        file_name_patterns: Option<Vec<String>>,
        patterns: CompiledPatternSet,
        include_derived: bool,
    ) -> Self
    where
        I: IntoIterator<Item = ResourceProxy>,
    {
        let roots = build_root_set(candidates, include_derived);
        log::debug!(
            "SearchScope: Created scope with {} roots, patterns {:?}, include derived: {include_derived}",
            roots.len(),
            file_name_patterns
        );
        SearchScope {
            roots,
            file_name_patterns,
            patterns,
            include_derived,
        }
    }

    pub fn roots(&self) -> &[ResourcePath] {
        self.roots.paths()
    }

    pub fn root_set(&self) -> &RootSet {
        &self.roots
    }

    pub fn include_derived(&self) -> bool {
        self.include_derived
    }

    // Raw patterns exactly as supplied, or `None` when every file name matches.
    pub fn file_name_patterns(&self) -> Option<&[String]> {
        self.file_name_patterns.as_deref()
    }

    pub fn compiled_patterns(&self) -> &CompiledPatternSet {
        &self.patterns
    }

    // A fresh, empty cache for one worker. Call once per worker per walk.
    pub fn matcher_cache(&self) -> WorkerMatcherCache<'_> {
        WorkerMatcherCache::new(&self.patterns)
    }

    /*
     * Membership predicate, called once per visited resource by any number of
     * workers at once.
     *
     * Derived resources are rejected first when the scope excludes them,
     * whatever their kind. Containers that pass are always members, because
     * patterns apply to file names only; a walker treats a `false` answer for a
     * container as "do not descend". Files must pass the inclusion matcher, if
     * any, and then must not hit the exclusion matcher; exclusion always wins.
     *
     * Args:
     *   proxy: The visited resource. Only its name, kind and derived flag are
     *     consulted; the path is used for trace logging.
     *   cache: The calling worker's own matcher cache, obtained from
     *     `matcher_cache` on this same scope. Its matcher is created lazily on
     *     the first file that needs one.
     *
     * Returns:
     *   `true` when the resource belongs to the scope. Never fails and has no
     *   side effects beyond the calling worker's cache.
     */
    pub fn contains(&self, proxy: &ResourceProxy, cache: &mut WorkerMatcherCache<'_>) -> bool {
        debug_assert!(
            std::ptr::eq(cache.patterns(), &self.patterns),
            "matcher cache belongs to a different scope"
        );

        if !self.include_derived && proxy.derived {
            log::trace!("SearchScope: Rejecting derived resource {}", proxy.path);
            return false;
        }

        match proxy.kind {
            ResourceKind::Container => true,
            ResourceKind::File => {
                if self.patterns.is_match_all() {
                    return true;
                }
                let matcher = cache.matcher();
                let verdict = matcher.check(proxy.name());
                if log::log_enabled!(log::Level::Trace) {
                    match verdict {
                        FileNameVerdict::Accepted => {}
                        FileNameVerdict::NotIncluded => log::trace!(
                            "SearchScope: {} matches no inclusion pattern",
                            proxy.path
                        ),
                        FileNameVerdict::Excluded { .. } => log::trace!(
                            "SearchScope: {} excluded by '{}'",
                            proxy.path,
                            matcher.excluding_pattern(verdict).unwrap_or_default()
                        ),
                    }
                }
                verdict.is_accepted()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::candidate_provider::ExplicitRootCandidates;

    fn scope(patterns: Option<&[&str]>, include_derived: bool) -> SearchScope {
        SearchScope::with_case_sensitivity(
            vec![ResourceProxy::container("/proj")],
            patterns.map(|p| p.iter().map(|s| s.to_string()).collect()),
            include_derived,
            true,
        )
        .unwrap()
    }

    fn member(scope: &SearchScope, proxy: ResourceProxy) -> bool {
        let mut cache = scope.matcher_cache();
        scope.contains(&proxy, &mut cache)
    }

    #[test]
    fn test_absent_patterns_include_every_file() {
        let scope = scope(None, false);

        assert!(member(&scope, ResourceProxy::file("/proj/README.md")));
        assert!(member(&scope, ResourceProxy::file("/proj/a/b/c.weird")));
        assert!(scope.file_name_patterns().is_none());
    }

    #[test]
    fn test_inclusion_and_exclusion_interplay() {
        // Arrange
        let scope = scope(Some(&["*.java", "!Test*.java"]), false);
        let mut cache = scope.matcher_cache();

        // Act / Assert
        assert!(scope.contains(&ResourceProxy::file("/proj/Foo.java"), &mut cache));
        assert!(!scope.contains(&ResourceProxy::file("/proj/TestFoo.java"), &mut cache));
        assert!(!scope.contains(&ResourceProxy::file("/proj/Foo.txt"), &mut cache));
    }

    #[test]
    fn test_negation_only_excludes_matching_names_case_sensitively() {
        let scope = scope(Some(&["!*.txt"]), false);

        assert!(!member(&scope, ResourceProxy::file("/proj/notes.txt")));
        assert!(member(&scope, ResourceProxy::file("/proj/NOTES.TXT")));
        assert!(member(&scope, ResourceProxy::file("/proj/main.rs")));
    }

    #[test]
    fn test_blank_negation_behaves_like_no_patterns() {
        let scope = scope(Some(&["   !  "]), false);

        assert!(scope.compiled_patterns().is_match_all());
        assert!(member(&scope, ResourceProxy::file("/proj/anything.bin")));
        assert_eq!(scope.file_name_patterns(), Some(&["   !  ".to_string()][..]));
    }

    #[test]
    fn test_whitespace_inclusion_pattern_rejects_ordinary_files() {
        let scope = scope(Some(&["   "]), false);

        assert!(!scope.compiled_patterns().is_match_all());
        assert!(!member(&scope, ResourceProxy::file("/proj/Foo.java")));
        assert!(member(&scope, ResourceProxy::container("/proj/src")));
    }

    #[test]
    fn test_containers_ignore_file_name_patterns() {
        let scope = scope(Some(&["*.java"]), false);

        assert!(member(&scope, ResourceProxy::container("/proj/src")));
    }

    #[test]
    fn test_derived_resources_follow_policy() {
        let excluding = scope(Some(&["*.java"]), false);
        let including = scope(Some(&["*.java"]), true);
        let derived_dir = ResourceProxy::container("/proj/build").with_derived(true);
        let derived_java = ResourceProxy::file("/proj/build/Gen.java").with_derived(true);
        let derived_txt = ResourceProxy::file("/proj/build/gen.txt").with_derived(true);

        assert!(!member(&excluding, derived_dir.clone()));
        assert!(!member(&excluding, derived_java.clone()));
        assert!(!member(&excluding, derived_txt.clone()));

        assert!(member(&including, derived_dir));
        assert!(member(&including, derived_java));
        assert!(!member(&including, derived_txt));
    }

    #[test]
    fn test_malformed_pattern_blocks_scope_creation() {
        let result = SearchScope::with_case_sensitivity(
            vec![ResourceProxy::container("/proj")],
            Some(vec!["*.rs".to_string(), "[oops".to_string()]),
            false,
            true,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_from_provider_reduces_candidates() {
        let provider = ExplicitRootCandidates::new(vec![
            ResourceProxy::container("/proj/src/pkg"),
            ResourceProxy::container("/proj/src"),
            ResourceProxy::container("/proj/bin").with_derived(true),
        ]);

        let scope = SearchScope::from_provider(&provider, None, false).unwrap();

        assert_eq!(scope.roots(), &[ResourcePath::parse("/proj/src")]);
        assert!(!scope.include_derived());
    }

    #[test]
    fn test_from_provider_and_new_build_the_same_scope() {
        // Arrange
        let candidates = vec![
            ResourceProxy::container("/proj/lib"),
            ResourceProxy::container("/proj"),
            ResourceProxy::container("/out").with_derived(true),
        ];
        let patterns = Some(vec!["*.rs".to_string(), "!*_gen.rs".to_string()]);
        let provider = ExplicitRootCandidates::new(candidates.clone());

        // Act
        let direct = SearchScope::new(candidates, patterns.clone(), false).unwrap();
        let provided = SearchScope::from_provider(&provider, patterns, false).unwrap();

        // Assert
        assert_eq!(direct.roots(), provided.roots());
        assert_eq!(direct.file_name_patterns(), provided.file_name_patterns());
        assert_eq!(direct.include_derived(), provided.include_derived());
        assert_eq!(
            direct.compiled_patterns().is_case_sensitive(),
            provided.compiled_patterns().is_case_sensitive()
        );
    }

    #[test]
    fn test_from_provider_reports_pattern_error() {
        let provider = ExplicitRootCandidates::new(Vec::new());

        let result = SearchScope::from_provider(&provider, Some(vec!["!{a".to_string()]), true);

        assert!(matches!(result, Err(ScopeError::Pattern(_))));
    }

    #[test]
    fn test_empty_candidates_give_empty_roots() {
        let scope = SearchScope::new(Vec::new(), None, false).unwrap();

        assert!(scope.roots().is_empty());
    }

    #[test]
    fn test_concurrent_contains_matches_sequential_results() {
        // Arrange
        crate::initialize_logging();
        let scope = scope(Some(&["*.rs", "*.toml", "!*_gen.rs"]), false);
        let proxies: Vec<ResourceProxy> = (0..400)
            .map(|i| match i % 5 {
                0 => ResourceProxy::file(&format!("/proj/src/m{i}.rs")),
                1 => ResourceProxy::file(&format!("/proj/src/m{i}_gen.rs")),
                2 => ResourceProxy::file(&format!("/proj/c{i}.toml")),
                3 => ResourceProxy::container(&format!("/proj/d{i}")),
                _ => ResourceProxy::file(&format!("/proj/out/x{i}.rs")).with_derived(true),
            })
            .collect();
        let sequential: Vec<bool> = {
            let mut cache = scope.matcher_cache();
            proxies.iter().map(|p| scope.contains(p, &mut cache)).collect()
        };

        // Act
        let chunk_size = proxies.len() / 8;
        let concurrent: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = proxies
                .chunks(chunk_size)
                .map(|chunk| {
                    let scope = &scope;
                    s.spawn(move || {
                        let mut cache = scope.matcher_cache();
                        chunk
                            .iter()
                            .map(|p| scope.contains(p, &mut cache))
                            .collect::<Vec<bool>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        // Assert
        assert_eq!(concurrent, sequential);
    }
}
