/*
 * Compiles user-supplied file name globs into two independent matchers: an
 * inclusion set built from plain patterns and an exclusion set built from
 * patterns carrying the `!` negation marker. An absent matcher means "match
 * everything" for inclusion and "match nothing" for exclusion.
 *
 * The compiled `GlobSet`s are immutable and shared freely between workers; the
 * per-worker scratch state used while matching lives in `worker_matcher`.
 */
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

pub const FILE_PATTERN_NEGATOR: &str = "!";

// Whether file names on the host filesystem compare case-sensitively. Fixed for
// the lifetime of the process.
pub const IS_CASE_SENSITIVE_FILESYSTEM: bool = !cfg!(windows);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid file name pattern '{pattern}': {message}")]
pub struct PatternSyntaxError {
    pub pattern: String,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, PatternSyntaxError>;

/*
 * One compiled bucket: the glob set plus the source patterns in the same order,
 * so a match index reported by the set can be traced back to its pattern.
 */
#[derive(Debug, Clone)]
pub struct FileNameMatcher {
    set: GlobSet,
    patterns: Vec<String>,
}

impl FileNameMatcher {
    pub fn glob_set(&self) -> &GlobSet {
        &self.set
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn pattern(&self, index: usize) -> Option<&str> {
        self.patterns.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct CompiledPatternSet {
    inclusion: Option<FileNameMatcher>,
    exclusion: Option<FileNameMatcher>,
    case_sensitive: bool,
}

impl CompiledPatternSet {
    // A set with no patterns at all: every file name is accepted.
    pub fn match_all(case_sensitive: bool) -> Self {
        CompiledPatternSet {
            inclusion: None,
            exclusion: None,
            case_sensitive,
        }
    }

    pub fn inclusion(&self) -> Option<&FileNameMatcher> {
        self.inclusion.as_ref()
    }

    pub fn exclusion(&self) -> Option<&FileNameMatcher> {
        self.exclusion.as_ref()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_match_all(&self) -> bool {
        self.inclusion.is_none() && self.exclusion.is_none()
    }
}

/*
 * Compiles `patterns` into a `CompiledPatternSet`.
 *
 * A pattern whose first non-blank character is the negation marker goes to the
 * exclusion bucket with the marker stripped and whitespace trimmed; a negated
 * pattern that is blank after trimming is dropped. Every other pattern goes to
 * the inclusion bucket exactly as given, whitespace included. Only the empty
 * string is dropped from the inclusion bucket, so `"   "` is a real inclusion
 * pattern that matches no ordinary file name.
 *
 * Glob syntax is `globset`'s: besides `*` and `?`, the characters `[`, `]`, `{`
 * and `}` are metacharacters. A name containing them literally, such as
 * `Foo[1].java`, must escape them (`Foo\[1\].java` on non-Windows hosts) or it is
 * read as a character class, and an unbalanced one is a `PatternSyntaxError`.
 *
 * Args:
 *   patterns: The raw patterns, or `None` when every file name should match.
 *     An empty slice is treated like `None`.
 *   case_sensitive: Whether both buckets compare file names case-sensitively.
 *
 * Returns:
 *   The compiled inclusion and exclusion matchers, or a `PatternSyntaxError`
 *   naming the first malformed glob. No partial result is produced.
 */
pub fn compile_patterns(
    patterns: Option<&[String]>,
    case_sensitive: bool,
) -> Result<CompiledPatternSet> {
    let Some(patterns) = patterns.filter(|p| !p.is_empty()) else {
        log::debug!("PatternCompiler: No file name patterns, matching all file names.");
        return Ok(CompiledPatternSet::match_all(case_sensitive));
    };

    let mut inclusion_patterns: Vec<String> = Vec::new();
    let mut exclusion_patterns: Vec<String> = Vec::new();
    for pattern in patterns {
        if let Some(negated) = pattern.trim_start().strip_prefix(FILE_PATTERN_NEGATOR) {
            let negated = negated.trim();
            if !negated.is_empty() {
                exclusion_patterns.push(negated.to_string());
            }
        } else if !pattern.is_empty() {
            inclusion_patterns.push(pattern.clone());
        }
    }

    let inclusion = build_matcher(inclusion_patterns, case_sensitive)?;
    let exclusion = build_matcher(exclusion_patterns, case_sensitive)?;
    log::debug!(
        "PatternCompiler: Compiled {} inclusion and {} exclusion patterns (case sensitive: {case_sensitive}).",
        inclusion.as_ref().map_or(0, |m| m.patterns.len()),
        exclusion.as_ref().map_or(0, |m| m.patterns.len()),
    );

    Ok(CompiledPatternSet {
        inclusion,
        exclusion,
        case_sensitive,
    })
}

fn build_matcher(patterns: Vec<String>, case_sensitive: bool) -> Result<Option<FileNameMatcher>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in &patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| PatternSyntaxError {
                pattern: pattern.clone(),
                message: e.kind().to_string(),
            })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|e| PatternSyntaxError {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })?;

    Ok(Some(FileNameMatcher { set, patterns }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_absent_and_empty_patterns_match_all() {
        let absent = compile_patterns(None, true).unwrap();
        let empty = compile_patterns(Some(&[]), true).unwrap();

        assert!(absent.is_match_all());
        assert!(empty.is_match_all());
    }

    #[test]
    fn test_patterns_are_partitioned_by_negation_marker() {
        // Arrange
        let patterns = owned(&["*.java", "!Test*.java", "! *.class ", "*.xml"]);

        // Act
        let compiled = compile_patterns(Some(&patterns), true).unwrap();

        // Assert
        let inclusion = compiled.inclusion().expect("inclusion matcher");
        let exclusion = compiled.exclusion().expect("exclusion matcher");
        assert_eq!(inclusion.patterns(), &["*.java", "*.xml"]);
        assert_eq!(exclusion.patterns(), &["Test*.java", "*.class"]);
        assert!(inclusion.glob_set().is_match("Foo.java"));
        assert!(exclusion.glob_set().is_match("TestFoo.java"));
        assert!(!exclusion.glob_set().is_match("Foo.java"));
    }

    #[test]
    fn test_blank_negation_is_dropped() {
        let patterns = owned(&["   !  "]);

        let compiled = compile_patterns(Some(&patterns), true).unwrap();

        assert!(compiled.inclusion().is_none());
        assert!(compiled.exclusion().is_none());
        assert!(compiled.is_match_all());
    }

    #[test]
    fn test_whitespace_inclusion_pattern_is_kept_and_matches_nothing() {
        // Arrange
        let patterns = owned(&["   ", ""]);

        // Act
        let compiled = compile_patterns(Some(&patterns), true).unwrap();

        // Assert
        assert!(!compiled.is_match_all());
        let inclusion = compiled.inclusion().expect("inclusion matcher");
        assert_eq!(inclusion.patterns(), &["   "]);
        assert!(!inclusion.glob_set().is_match("Foo.java"));
        assert!(compiled.exclusion().is_none());
    }

    #[test]
    fn test_bracketed_literal_name_needs_escaping() {
        let plain = compile_patterns(Some(&owned(&["Foo[1].java"])), true).unwrap();

        let inclusion = plain.inclusion().unwrap();
        assert!(inclusion.glob_set().is_match("Foo1.java"));
        assert!(!inclusion.glob_set().is_match("Foo[1].java"));
        assert!(compile_patterns(Some(&owned(&["Foo[1.java"])), true).is_err());
    }

    #[test]
    fn test_negation_only_leaves_inclusion_absent() {
        let patterns = owned(&["!*.txt"]);

        let compiled = compile_patterns(Some(&patterns), true).unwrap();

        assert!(compiled.inclusion().is_none());
        assert_eq!(compiled.exclusion().unwrap().patterns(), &["*.txt"]);
    }

    #[test]
    fn test_case_sensitivity_is_fixed_at_compile_time() {
        let patterns = owned(&["*.TXT"]);

        let sensitive = compile_patterns(Some(&patterns), true).unwrap();
        let insensitive = compile_patterns(Some(&patterns), false).unwrap();

        assert!(sensitive.is_case_sensitive());
        assert!(!sensitive.inclusion().unwrap().glob_set().is_match("notes.txt"));
        assert!(insensitive.inclusion().unwrap().glob_set().is_match("notes.txt"));
    }

    #[test]
    fn test_malformed_pattern_fails_compilation() {
        let patterns = owned(&["*.java", "[abc"]);

        let err = compile_patterns(Some(&patterns), true).unwrap_err();

        assert_eq!(err.pattern, "[abc");
        assert!(err.to_string().contains("[abc"));
    }

    #[test]
    fn test_malformed_negated_pattern_fails_compilation() {
        let patterns = owned(&["!{a,b"]);

        let err = compile_patterns(Some(&patterns), true).unwrap_err();

        assert_eq!(err.pattern, "{a,b");
    }
}
