//! SHA-256 content digests
//!
//! Provides the single canonical fingerprint (`sha256:<hex>`) used to decide
//! whether two files hold identical bytes. Digests depend on content only,
//! never on names, timestamps or permissions.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{Error, Result};

/// Prefix for the display form of every digest
const PREFIX: &str = "sha256:";

/// A 256-bit content fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREFIX)?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self)
    }
}

/// Computes content fingerprints for files.
///
/// The mirror engine holds a `Box<dyn ContentHasher>` so an alternative
/// implementation can be swapped in. Implementations must be deterministic
/// and must fail with [`Error::Read`] instead of guessing when the file
/// cannot be read completely.
pub trait ContentHasher: Send + Sync {
    /// Digest the full byte content of the file at `path`.
    fn hash(&self, path: &Path) -> Result<ContentDigest>;
}

/// Default [`ContentHasher`] streaming the file through SHA-256.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn hash(&self, path: &Path) -> Result<ContentDigest> {
        compute_file_digest(path)
    }
}

/// Compute the digest of in-memory bytes.
pub fn compute_content_digest(content: &[u8]) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(content);
    ContentDigest(hasher.finalize().into())
}

/// Compute the digest of a file's contents.
///
/// # Errors
///
/// Returns [`Error::Read`] if the file cannot be opened or read to the end.
pub fn compute_file_digest(path: &Path) -> Result<ContentDigest> {
    let file = File::open(path).map_err(|e| Error::read(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    std::io::copy(&mut reader, &mut hasher).map_err(|e| Error::read(path, e))?;
    Ok(ContentDigest(hasher.finalize().into()))
}
