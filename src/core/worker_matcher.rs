/*
 * Per-worker matcher state. A `CompiledPatternSet` is immutable and shared by
 * every worker of a walk; what a worker needs privately is the mutable scratch
 * space used while matching (the buffer of matching pattern indices and the
 * last file name tested). Each worker owns one `WorkerMatcherCache`, obtained
 * from `SearchScope::matcher_cache`, and the cache instantiates its
 * `WorkerMatcher` lazily on the first file it is asked about. Ownership is the
 * worker identity, so nothing here is ever locked or shared.
 */
use super::file_name_patterns::{CompiledPatternSet, FileNameMatcher};

// Outcome of testing one file name. `Excluded` records which exclusion pattern fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileNameVerdict {
    Accepted,
    NotIncluded,
    Excluded { pattern_index: usize },
}

impl FileNameVerdict {
    pub fn is_accepted(self) -> bool {
        self == FileNameVerdict::Accepted
    }
}

#[derive(Debug)]
pub struct WorkerMatcher<'a> {
    patterns: &'a CompiledPatternSet,
    hits: Vec<usize>,
    last_name: String,
    last_verdict: Option<FileNameVerdict>,
}

impl<'a> WorkerMatcher<'a> {
    fn new(patterns: &'a CompiledPatternSet) -> Self {
        WorkerMatcher {
            patterns,
            hits: Vec::new(),
            last_name: String::new(),
            last_verdict: None,
        }
    }

    /*
     * Tests `name` against the inclusion bucket first and the exclusion bucket
     * second. Exclusion is an independent veto applied only after inclusion
     * passes. Repeating the previous name reuses the previous verdict.
     */
    pub fn check(&mut self, name: &str) -> FileNameVerdict {
        if let Some(verdict) = self.last_verdict {
            if self.last_name == name {
                return verdict;
            }
        }

        let verdict = self.evaluate(name);
        self.last_name.clear();
        self.last_name.push_str(name);
        self.last_verdict = Some(verdict);
        verdict
    }

    pub fn matches(&mut self, name: &str) -> bool {
        self.check(name).is_accepted()
    }

    fn evaluate(&mut self, name: &str) -> FileNameVerdict {
        let patterns = self.patterns;
        if let Some(inclusion) = patterns.inclusion() {
            if !self.collect_hits(inclusion, name) {
                return FileNameVerdict::NotIncluded;
            }
        }
        if let Some(exclusion) = patterns.exclusion() {
            if self.collect_hits(exclusion, name) {
                return FileNameVerdict::Excluded {
                    pattern_index: self.hits[0],
                };
            }
        }
        FileNameVerdict::Accepted
    }

    fn collect_hits(&mut self, matcher: &FileNameMatcher, name: &str) -> bool {
        // matches_into clears the buffer before filling it.
        matcher.glob_set().matches_into(name, &mut self.hits);
        !self.hits.is_empty()
    }

    // Source text of the exclusion pattern behind an `Excluded` verdict.
    pub fn excluding_pattern(&self, verdict: FileNameVerdict) -> Option<&'a str> {
        match verdict {
            FileNameVerdict::Excluded { pattern_index } => self
                .patterns
                .exclusion()
                .and_then(|exclusion| exclusion.pattern(pattern_index)),
            _ => None,
        }
    }
}

/*
 * One worker's slot. Creating a cache is free; the matcher inside is built the
 * first time `matcher` is called and then reused for the rest of the pass.
 */
#[derive(Debug)]
pub struct WorkerMatcherCache<'a> {
    patterns: &'a CompiledPatternSet,
    matcher: Option<WorkerMatcher<'a>>,
}

impl<'a> WorkerMatcherCache<'a> {
    pub fn new(patterns: &'a CompiledPatternSet) -> Self {
        WorkerMatcherCache {
            patterns,
            matcher: None,
        }
    }

    pub fn matcher(&mut self) -> &mut WorkerMatcher<'a> {
        let patterns = self.patterns;
        self.matcher.get_or_insert_with(|| {
            log::trace!(
                "WorkerMatcherCache: Creating matcher for {:?}",
                std::thread::current().id()
            );
            WorkerMatcher::new(patterns)
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.matcher.is_some()
    }

    pub fn patterns(&self) -> &'a CompiledPatternSet {
        self.patterns
    }
}
