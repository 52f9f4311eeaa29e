//! Command implementations for mirror-cli

pub mod mirror;

pub use mirror::{load_config, run_mirror};
