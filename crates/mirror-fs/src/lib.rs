//! Filesystem layer for dirmirror
//!
//! Provides content digests, tree-relative paths, atomic copies, locked log
//! appends and configuration file loading. Everything above this crate talks
//! to the filesystem through these functions so that failures arrive already
//! classified as read, write or directory-structure errors.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{ContentDigest, ContentHasher, Sha256Hasher, compute_content_digest, compute_file_digest};
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::RelativePath;
