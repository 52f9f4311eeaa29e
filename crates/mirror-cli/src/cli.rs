//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use mirror_core::PartialConfig;

/// dirmirror - Keep a replica directory identical to a source directory
#[derive(Parser, Debug)]
#[command(name = "dirmirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (.toml, .json, .yaml or .yml)
    #[arg(short, long, env = "DIRMIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Source (original) directory
    #[arg(short, long)]
    pub source: Option<String>,

    /// Destination (replica) directory
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Directory that holds sync_log.txt
    #[arg(short, long = "log-dir")]
    pub log_dir: Option<String>,

    /// Seconds to wait after each pass before the next one
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Log what would change without touching the destination
    #[arg(long)]
    pub dry_run: bool,

    /// Print the pass report as JSON (requires --once)
    #[arg(long, requires = "once")]
    pub json: bool,

    /// Fail instead of asking for missing or invalid values
    #[arg(long)]
    pub no_prompt: bool,

    /// Do not echo log lines to stdout
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Values given on the command line, to be laid over the config file.
    pub fn overrides(&self) -> PartialConfig {
        PartialConfig {
            source: self.source.clone(),
            destination: self.destination.clone(),
            log_destination: self.log_dir.clone(),
            interval_seconds: self.interval,
        }
    }

    /// Whether log lines should be echoed to stdout
    pub fn echo(&self) -> bool {
        !self.quiet && !self.json
    }
}
