/*
 * Reduces a possibly-overlapping list of candidate roots into a minimal covering
 * set: no entry is an ancestor of (or equal to) another. A broader root always
 * wins over a narrower one nested inside it, whatever the arrival order, and the
 * surviving entries keep their relative input order.
 */
use super::resource_path::{ResourcePath, ResourceProxy};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RootSet {
    roots: Vec<ResourcePath>,
}

impl RootSet {
    pub fn paths(&self) -> &[ResourcePath] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    // True when some root is an ancestor of, or equal to, `path`.
    pub fn covers(&self, path: &ResourcePath) -> bool {
        self.roots.iter().any(|root| root.is_prefix_of(path))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourcePath> {
        self.roots.iter()
    }
}

impl<'a> IntoIterator for &'a RootSet {
    type Item = &'a ResourcePath;
    type IntoIter = std::slice::Iter<'a, ResourcePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}

/*
 * Builds a `RootSet` from candidates in a single pass. Derived candidates are
 * dropped up front unless `include_derived` is set. Each surviving candidate is
 * checked against the set built so far, newest entry first: an entry that covers
 * the candidate discards it, and entries the candidate covers are removed.
 * Exact duplicates therefore collapse onto their first occurrence, whatever
 * their derived flags.
 *
 * Args:
 *   candidates: Root candidates in the order the provider produced them. Only
 *     the path and derived flag matter; files and containers reduce alike.
 *   include_derived: When false, derived candidates take no part in the
 *     reduction at all, so they can neither survive nor subsume a clean root.
 *
 * Returns:
 *   A `RootSet` in which no root is an ancestor of, or equal to, another, every
 *   admitted candidate is covered by some root, and the roots keep their
 *   relative input order. Rebuilding from the result yields the same set.
 */
pub fn build_root_set<I>(candidates: I, include_derived: bool) -> RootSet
where
    I: IntoIterator<Item = ResourceProxy>,
{
    let mut roots: Vec<ResourcePath> = Vec::new();
    let mut dropped_derived = 0usize;
    let mut considered = 0usize;

    for candidate in candidates {
        considered += 1;
        if !include_derived && candidate.derived {
            dropped_derived += 1;
            log::trace!(
                "RootSetBuilder: Dropping derived candidate {}",
                candidate.path
            );
            continue;
        }
        add_candidate(&mut roots, candidate.path);
    }

    log::debug!(
        "RootSetBuilder: Reduced {considered} candidates to {} roots ({dropped_derived} derived dropped).",
        roots.len()
    );
    RootSet { roots }
}

fn add_candidate(roots: &mut Vec<ResourcePath>, candidate: ResourcePath) {
    for index in (0..roots.len()).rev() {
        if roots[index].is_prefix_of(&candidate) {
            log::trace!(
                "RootSetBuilder: Candidate {candidate} already covered by {}",
                roots[index]
            );
            return;
        }
        if candidate.is_strict_prefix_of(&roots[index]) {
            let subsumed = roots.remove(index);
            log::trace!("RootSetBuilder: Candidate {candidate} subsumes {subsumed}");
        }
    }
    roots.push(candidate);
}
