/*
 * Primitive path operations for the resource tree, plus the read-only view of a
 * tree node (`ResourceProxy`) that the walker hands to the scope at traversal time.
 * A `ResourcePath` is workspace-relative: the empty path is the workspace root and
 * is a prefix of every other path.
 */
use std::fmt;
use std::path::{Component, Path};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    pub fn workspace_root() -> Self {
        ResourcePath::default()
    }

    /*
     * Parses a slash-separated path such as "/proj/src/pkg". Empty segments
     * (leading, trailing or doubled separators) are ignored.
     */
    pub fn parse(text: &str) -> Self {
        ResourcePath {
            segments: text
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /*
     * Builds a path from a filesystem path that is already relative to the
     * workspace directory. `.` components are dropped and `..` pops a segment,
     * so callers can pass lightly un-normalized input. A `..` with nothing left
     * to pop is ignored; callers that must not leave the workspace check
     * containment before building the path.
     */
    pub fn from_relative(relative: &Path) -> Self {
        let mut segments: Vec<String> = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
                Component::ParentDir => {
                    segments.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        ResourcePath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_workspace_root(&self) -> bool {
        self.segments.is_empty()
    }

    // Last segment, i.e. the resource's own name. Empty for the workspace root.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    pub fn append(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        ResourcePath { segments }
    }

    /*
     * True when `self` is an ancestor of `other` or equal to it. Comparison is
     * segment-wise and exact, so "/a/b" is not a prefix of "/a/bc".
     */
    pub fn is_prefix_of(&self, other: &ResourcePath) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(mine, theirs)| mine == theirs)
    }

    pub fn is_strict_prefix_of(&self, other: &ResourcePath) -> bool {
        self.segments.len() < other.segments.len() && self.is_prefix_of(other)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    File,
    Container,
}

/*
 * Lightweight, read-only view of a tree node. `derived` is true when the node
 * itself or any of its ancestors is marked as derived (generated/build output);
 * producers are responsible for folding the ancestry into this single flag.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceProxy {
    pub path: ResourcePath,
    pub kind: ResourceKind,
    pub derived: bool,
}

impl ResourceProxy {
    pub fn new(path: ResourcePath, kind: ResourceKind, derived: bool) -> Self {
        ResourceProxy {
            path,
            kind,
            derived,
        }
    }

    pub fn file(path: &str) -> Self {
        ResourceProxy::new(ResourcePath::parse(path), ResourceKind::File, false)
    }

    pub fn container(path: &str) -> Self {
        ResourceProxy::new(ResourcePath::parse(path), ResourceKind::Container, false)
    }

    pub fn with_derived(mut self, derived: bool) -> Self {
        self.derived = derived;
        self
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn is_container(&self) -> bool {
        self.kind == ResourceKind::Container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_ignores_empty_segments() {
        let path = ResourcePath::parse("//proj/src//pkg/");
        assert_eq!(path.segments(), &["proj", "src", "pkg"]);
        assert_eq!(path.to_string(), "/proj/src/pkg");
        assert_eq!(path.name(), "pkg");
    }

    #[test]
    fn test_workspace_root_is_prefix_of_everything() {
        let root = ResourcePath::workspace_root();
        assert!(root.is_workspace_root());
        assert!(root.is_prefix_of(&ResourcePath::parse("/a/b")));
        assert!(root.is_prefix_of(&root));
        assert!(!root.is_strict_prefix_of(&root));
        assert_eq!(root.to_string(), "/");
        assert_eq!(root.name(), "");
    }

    #[test]
    fn test_prefix_is_segment_wise() {
        let ab = ResourcePath::parse("/a/b");
        assert!(ab.is_prefix_of(&ResourcePath::parse("/a/b/c")));
        assert!(ab.is_prefix_of(&ResourcePath::parse("/a/b")));
        assert!(ab.is_strict_prefix_of(&ResourcePath::parse("/a/b/c")));
        assert!(!ab.is_prefix_of(&ResourcePath::parse("/a/bc")));
        assert!(!ab.is_prefix_of(&ResourcePath::parse("/a")));
    }

    #[test]
    fn test_from_relative_normalizes_components() {
        let path = ResourcePath::from_relative(&PathBuf::from("./src/../lib/./util"));
        assert_eq!(path, ResourcePath::parse("/lib/util"));
        assert_eq!(
            ResourcePath::parse("/lib").append("util"),
            ResourcePath::parse("/lib/util")
        );
    }

    #[test]
    fn test_proxy_helpers() {
        let proxy = ResourceProxy::file("/proj/Foo.java").with_derived(true);
        assert_eq!(proxy.name(), "Foo.java");
        assert!(proxy.derived);
        assert!(!proxy.is_container());
        assert!(ResourceProxy::container("/proj").is_container());
    }
}
