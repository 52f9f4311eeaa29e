//! Mirror configuration and pre-flight validation
//!
//! Values can come from a config file, command-line flags or an interactive
//! prompt. Each recognized option is checked against its predicate before
//! the scheduler starts; a rejected value is requested again from a
//! [`ValueProvider`] until it passes or the provider gives up.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The recognized configuration options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Source,
    Destination,
    LogDestination,
    Interval,
}

impl ConfigField {
    /// Key used in config files
    pub fn key(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Destination => "destination",
            Self::LogDestination => "log_destination",
            Self::Interval => "interval_seconds",
        }
    }

    /// Question shown when asking for the value
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Source => "Source (original) directory",
            Self::Destination => "Destination (replica) directory",
            Self::LogDestination => "Log file directory",
            Self::Interval => "Synchronization interval in seconds",
        }
    }
}

/// A fully validated configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub log_destination: PathBuf,
    pub interval_seconds: u64,
}

impl MirrorConfig {
    /// Check every field predicate and the cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        for (field, path) in [
            (ConfigField::Source, &self.source),
            (ConfigField::Destination, &self.destination),
            (ConfigField::LogDestination, &self.log_destination),
        ] {
            validate_directory(field, &path.to_string_lossy())?;
        }
        validate_interval(self.interval_seconds)?;
        check_trees_disjoint(&self.source, &self.destination)?;
        check_log_outside_destination(&self.log_destination, &self.destination)?;
        Ok(())
    }

    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_seconds)
    }
}

/// Configuration as loaded from a file or flags, possibly incomplete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub log_destination: Option<String>,
    pub interval_seconds: Option<u64>,
}

impl PartialConfig {
    /// Overlay `other` on top of `self`; values present in `other` win.
    pub fn merge(self, other: PartialConfig) -> Self {
        Self {
            source: other.source.or(self.source),
            destination: other.destination.or(self.destination),
            log_destination: other.log_destination.or(self.log_destination),
            interval_seconds: other.interval_seconds.or(self.interval_seconds),
        }
    }
}

/// Supplies a replacement value when a field is missing or invalid.
pub trait ValueProvider {
    /// Ask for `field`. `problem` describes why the previous value was
    /// rejected, if there was one.
    fn request(&mut self, field: ConfigField, problem: Option<&str>) -> Result<String>;
}

/// Provider that never supplies a value; the first problem is fatal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl ValueProvider for NoPrompt {
    fn request(&mut self, field: ConfigField, problem: Option<&str>) -> Result<String> {
        Err(match problem {
            Some(reason) => Error::invalid(field.key(), reason),
            None => Error::invalid(field.key(), "value is required"),
        })
    }
}

/// Turn a partial configuration into a validated one, asking `provider`
/// for every missing or rejected value.
pub fn resolve(partial: PartialConfig, provider: &mut dyn ValueProvider) -> Result<MirrorConfig> {
    let source = resolve_directory(ConfigField::Source, partial.source, provider)?;
    let mut destination = resolve_directory(ConfigField::Destination, partial.destination, provider)?;
    while let Err(e) = check_trees_disjoint(&source, &destination) {
        let raw = provider.request(ConfigField::Destination, Some(&e.to_string()))?;
        destination = resolve_directory(ConfigField::Destination, Some(raw), provider)?;
    }

    let mut log_destination =
        resolve_directory(ConfigField::LogDestination, partial.log_destination, provider)?;
    while let Err(e) = check_log_outside_destination(&log_destination, &destination) {
        let raw = provider.request(ConfigField::LogDestination, Some(&e.to_string()))?;
        log_destination = resolve_directory(ConfigField::LogDestination, Some(raw), provider)?;
    }

    let mut candidate = partial.interval_seconds.map(|n| n.to_string());
    let interval_seconds = loop {
        let problem = match candidate.take() {
            Some(raw) => match parse_interval(&raw) {
                Ok(value) => break value,
                Err(e) => Some(e.to_string()),
            },
            None => None,
        };
        candidate = Some(provider.request(ConfigField::Interval, problem.as_deref())?);
    };

    Ok(MirrorConfig {
        source,
        destination,
        log_destination,
        interval_seconds,
    })
}

fn resolve_directory(
    field: ConfigField,
    initial: Option<String>,
    provider: &mut dyn ValueProvider,
) -> Result<PathBuf> {
    let mut candidate = initial;
    loop {
        let problem = match candidate.take() {
            Some(raw) => match validate_directory(field, &raw) {
                Ok(path) => return Ok(path),
                Err(e) => Some(e.to_string()),
            },
            None => None,
        };
        candidate = Some(provider.request(field, problem.as_deref())?);
    }
}

/// Trim surrounding whitespace and trailing separators from typed input.
///
/// The filesystem root keeps its single separator.
pub fn clean_path_input(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let without_trailing = trimmed.trim_end_matches(['/', '\\']);
    if without_trailing.is_empty() && !trimmed.is_empty() {
        PathBuf::from(&trimmed[..1])
    } else {
        PathBuf::from(without_trailing)
    }
}

/// Predicate for the three directory options.
///
/// The path must be absolute and name an existing directory.
pub fn validate_directory(field: ConfigField, raw: &str) -> Result<PathBuf> {
    let path = clean_path_input(raw);
    if path.as_os_str().is_empty() {
        return Err(Error::invalid(field.key(), "path is empty"));
    }
    if !path.is_absolute() {
        return Err(Error::invalid(
            field.key(),
            format!("{} is not an absolute path", path.display()),
        ));
    }
    if !path.exists() {
        return Err(Error::invalid(
            field.key(),
            format!("directory {} does not exist", path.display()),
        ));
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory { path });
    }
    Ok(path)
}

/// Predicate for the interval option.
pub fn validate_interval(seconds: u64) -> Result<u64> {
    if seconds == 0 {
        return Err(Error::invalid(
            ConfigField::Interval.key(),
            "the interval must be a whole number greater than 0",
        ));
    }
    Ok(seconds)
}

/// Parse and validate a typed interval.
pub fn parse_interval(raw: &str) -> Result<u64> {
    let seconds = raw.trim().parse::<u64>().map_err(|_| {
        Error::invalid(
            ConfigField::Interval.key(),
            "the interval must be a whole number greater than 0",
        )
    })?;
    validate_interval(seconds)
}

/// Source and destination must be different trees, neither inside the other.
pub fn check_trees_disjoint(source: &Path, destination: &Path) -> Result<()> {
    let source_dir = dunce::canonicalize(source)?;
    let destination_dir = dunce::canonicalize(destination)?;
    if source_dir.starts_with(&destination_dir) || destination_dir.starts_with(&source_dir) {
        return Err(Error::OverlappingTrees {
            source_dir,
            destination_dir,
        });
    }
    Ok(())
}

/// The log directory may not live inside the destination, where each pass
/// would remove it as an orphan.
pub fn check_log_outside_destination(log_destination: &Path, destination: &Path) -> Result<()> {
    let log_dir = dunce::canonicalize(log_destination)?;
    let destination_dir = dunce::canonicalize(destination)?;
    if log_dir.starts_with(&destination_dir) {
        return Err(Error::invalid(
            ConfigField::LogDestination.key(),
            format!(
                "{} is inside the destination {}",
                log_dir.display(),
                destination_dir.display()
            ),
        ));
    }
    Ok(())
}
