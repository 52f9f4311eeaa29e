//! Shared test utilities for the dirmirror workspace.
//!
//! This crate provides standardised fixtures so each crate's test suite does
//! not rebuild temporary trees and clocks by hand. It is a dev-dependency
//! only and is never published.
//!
//! # Modules
//!
//! - [`tree`]: [`MirrorFixture`] with source, destination and log
//!   directories, plus tree snapshots for comparing two trees
//! - [`clock`]: [`FakeClock`] that records sleeps instead of blocking

pub mod clock;
pub mod tree;

pub use clock::FakeClock;
pub use tree::{MirrorFixture, Node, snapshot};
