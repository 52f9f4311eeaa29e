//! [`MirrorFixture`] builder for mirroring scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// One entry in a tree snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory,
    File(Vec<u8>),
}

/// Capture every entry beneath `root`, keyed by forward-slash relative path.
///
/// The root itself is not included.
///
/// # Panics
/// Panics if the tree cannot be walked or a file cannot be read.
pub fn snapshot(root: &Path) -> BTreeMap<String, Node> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap_or_else(|e| panic!("snapshot: walk failed: {e}"));
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let node = if entry.file_type().is_dir() {
                Node::Directory
            } else {
                Node::File(fs::read(entry.path()).unwrap_or_else(|e| {
                    panic!("snapshot: failed to read {}: {e}", entry.path().display())
                }))
            };
            (rel, node)
        })
        .collect()
}

/// Temporary `source/`, `destination/` and `logs/` directories.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::MirrorFixture;
///
/// let fixture = MirrorFixture::new();
/// fixture.write_source("sub/b.txt", "world");
/// fixture.assert_destination_missing("sub/b.txt");
/// ```
pub struct MirrorFixture {
    temp_dir: TempDir,
}

impl Default for MirrorFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorFixture {
    /// Create the three empty directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["source", "destination", "logs"] {
            fs::create_dir(temp_dir.path().join(dir)).unwrap();
        }
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn destination(&self) -> PathBuf {
        self.root().join("destination")
    }

    pub fn logs(&self) -> PathBuf {
        self.root().join("logs")
    }

    /// Write a source file, creating parent directories.
    pub fn write_source(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.source().join(rel), content.as_ref())
    }

    /// Write a destination file, creating parent directories.
    pub fn write_destination(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_file(&self.destination().join(rel), content.as_ref())
    }

    /// Create a source directory and its ancestors.
    pub fn mkdir_source(&self, rel: &str) -> PathBuf {
        let path = self.source().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Create a destination directory and its ancestors.
    pub fn mkdir_destination(&self, rel: &str) -> PathBuf {
        let path = self.destination().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Remove a source file or directory.
    pub fn remove_source(&self, rel: &str) {
        let path = self.source().join(rel);
        if path.is_dir() {
            fs::remove_dir_all(&path).unwrap();
        } else {
            fs::remove_file(&path).unwrap();
        }
    }

    /// Read a destination file as UTF-8.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_destination(&self, rel: &str) -> String {
        let path = self.destination().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read file {}: {e}", path.display()))
    }

    /// Contents of `logs/sync_log.txt`, or an empty string if absent.
    pub fn log_contents(&self) -> String {
        fs::read_to_string(self.logs().join("sync_log.txt")).unwrap_or_default()
    }

    /// Assert that `rel` exists in the destination.
    pub fn assert_destination_exists(&self, rel: &str) {
        let path = self.destination().join(rel);
        assert!(path.exists(), "Expected to exist: {}", path.display());
    }

    /// Assert that `rel` does **not** exist in the destination.
    pub fn assert_destination_missing(&self, rel: &str) {
        let path = self.destination().join(rel);
        assert!(
            fs::symlink_metadata(&path).is_err(),
            "Expected NOT to exist: {}",
            path.display()
        );
    }

    /// Assert that the destination holds exactly the source's entries and bytes.
    pub fn assert_mirrored(&self) {
        let source = snapshot(&self.source());
        let destination = snapshot(&self.destination());
        assert_eq!(source, destination, "destination does not mirror source");
    }
}

fn write_file(path: &Path, content: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}
