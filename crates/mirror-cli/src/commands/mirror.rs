//! The mirror command: resolve configuration, then run passes

use colored::Colorize;
use mirror_core::config::resolve;
use mirror_core::{
    LogFileSink, MirrorConfig, NoPrompt, PartialConfig, PassReport, SyncOptions, SyncScheduler,
    SystemClock, TreeDiffApplier, ValueProvider,
};
use mirror_fs::ConfigStore;

use crate::cli::Cli;
use crate::error::Result;
use crate::interactive::DialoguerPrompt;

/// Merge the config file with command-line values and validate the result.
///
/// Flags win over the file. Anything still missing or invalid is requested
/// from `provider`.
pub fn load_config(cli: &Cli, provider: &mut dyn ValueProvider) -> Result<MirrorConfig> {
    let from_file = match &cli.config {
        Some(path) => {
            tracing::debug!(config = ?path, "Loading config file");
            ConfigStore.load::<PartialConfig>(path)?
        }
        None => PartialConfig::default(),
    };
    Ok(resolve(from_file.merge(cli.overrides()), provider)?)
}

/// Run the mirror, forever or once
pub fn run_mirror(cli: &Cli) -> Result<()> {
    let config = if cli.no_prompt {
        load_config(cli, &mut NoPrompt)?
    } else {
        load_config(cli, &mut DialoguerPrompt)?
    };

    if cli.echo() {
        println!(
            "{} Mirroring {} to {} every {}s{}",
            "=>".blue().bold(),
            config.source.display().to_string().cyan(),
            config.destination.display().to_string().cyan(),
            config.interval_seconds,
            if cli.dry_run { " (dry run)" } else { "" }
        );
    }

    let applier = TreeDiffApplier::new(&config.source, &config.destination)
        .with_options(SyncOptions { dry_run: cli.dry_run });
    let sink = LogFileSink::new(&config.log_destination).with_echo(cli.echo());
    let mut scheduler = SyncScheduler::new(applier, sink, SystemClock, config.interval())?;

    if !cli.once {
        scheduler.run();
    }

    let report = scheduler.run_once();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &PassReport) {
    let status = if report.is_clean() {
        "OK".green().bold()
    } else {
        "ERRORS".red().bold()
    };
    println!(
        "{} {} new, {} modified, {} removed, {} directories created, {} unchanged, {} failed",
        status,
        report.copied_new(),
        report.copied_modified(),
        report.removed(),
        report.created_dirs(),
        report.unchanged.len(),
        report.failures.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn dirs() -> (TempDir, [String; 3]) {
        let temp = TempDir::new().unwrap();
        let names = ["source", "destination", "logs"].map(|name| {
            let path = temp.path().join(name);
            fs::create_dir(&path).unwrap();
            path.to_string_lossy().into_owned()
        });
        (temp, names)
    }

    #[test]
    fn flags_override_config_file() {
        let (temp, [src, dst, logs]) = dirs();
        let file = temp.path().join("mirror.toml");
        fs::write(
            &file,
            format!(
                "source = \"{src}\"\ndestination = \"{dst}\"\nlog_destination = \"{logs}\"\ninterval_seconds = 60\n"
            ),
        )
        .unwrap();

        let cli = Cli::parse_from(["dirmirror", "-c", file.to_str().unwrap(), "-i", "5"]);
        let config = load_config(&cli, &mut NoPrompt).unwrap();

        assert_eq!(config.interval_seconds, 5);
        assert_eq!(config.source.to_string_lossy(), src);
    }

    #[test]
    fn unsupported_config_format_is_fatal() {
        let (temp, _) = dirs();
        let file = temp.path().join("mirror.ini");
        fs::write(&file, "source=/x").unwrap();

        let cli = Cli::parse_from(["dirmirror", "-c", file.to_str().unwrap()]);
        let err = load_config(&cli, &mut NoPrompt).unwrap_err();

        assert!(matches!(err, crate::error::CliError::Fs(_)), "got: {err:?}");
    }
}
