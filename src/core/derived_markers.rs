/*
 * Derived-resource policy for plain filesystems, which carry no "derived"
 * attribute of their own. A set of directory names (build output folders such as
 * `target` or `out`) marks a directory and everything beneath it as derived.
 */
use super::resource_path::ResourcePath;
use std::collections::HashSet;

pub const DEFAULT_DERIVED_MARKERS: &[&str] = &["bin", "build", "out", "target"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedMarkers {
    names: HashSet<String>,
}

impl DerivedMarkers {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DerivedMarkers {
            names: names
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.trim().is_empty())
                .collect(),
        }
    }

    pub fn none() -> Self {
        DerivedMarkers {
            names: HashSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_marker(&self, segment: &str) -> bool {
        self.names.contains(segment)
    }

    /*
     * True when any segment of `path` is a marker. Because every ancestor's name
     * is part of the path, this folds "derived anywhere in the ancestry" into a
     * single flag without walking the tree.
     */
    pub fn is_derived(&self, path: &ResourcePath) -> bool {
        !self.names.is_empty() && path.segments().iter().any(|s| self.is_marker(s))
    }
}

impl Default for DerivedMarkers {
    fn default() -> Self {
        DerivedMarkers::new(DEFAULT_DERIVED_MARKERS.iter().copied())
    }
}
