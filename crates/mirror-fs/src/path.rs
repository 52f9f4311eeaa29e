//! Tree-relative paths used as the cross-tree identity key

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// A path relative to a tree root, normalized to forward slashes.
///
/// Two entries in the source and destination trees correspond to each other
/// iff their `RelativePath`s are equal. The root itself is the empty path and
/// displays as `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath {
    /// Internal representation always uses forward slashes, no leading slash
    inner: String,
}

impl RelativePath {
    /// The tree root.
    pub fn root() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Build a relative path from any path-like input.
    ///
    /// Root, prefix, `.` and `..` components are dropped so the result can
    /// never escape the tree it is resolved against.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let parts: Vec<String> = path
            .as_ref()
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().replace('\\', "/")),
                _ => None,
            })
            .collect();
        Self {
            inner: parts.join("/"),
        }
    }

    /// Relative location of `path` inside the tree rooted at `root`.
    ///
    /// Returns `None` if `path` is not beneath `root`.
    pub fn from_root(root: &Path, path: &Path) -> Option<Self> {
        path.strip_prefix(root).ok().map(Self::new)
    }

    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Join this relative path onto a tree root.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        if self.is_root() {
            root.to_path_buf()
        } else {
            root.join(&self.inner)
        }
    }

    /// Whether `base` is this path or one of its ancestors.
    pub fn starts_with(&self, base: &RelativePath) -> bool {
        base.is_root()
            || self.inner == base.inner
            || (self.inner.starts_with(&base.inner)
                && self.inner.as_bytes().get(base.inner.len()) == Some(&b'/'))
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.inner.rsplit('/').next()
        }
    }
}

impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.inner)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&Path> for RelativePath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
