//! End-to-end integration test for the library stack
//!
//! Exercises the complete flow: config file -> validation -> scheduler ->
//! applier -> log file.

use std::time::Duration;

use mirror_core::config::resolve;
use mirror_core::{LogFileSink, NoPrompt, PartialConfig, SyncScheduler, TreeDiffApplier};
use mirror_fs::ConfigStore;
use mirror_test_utils::{FakeClock, MirrorFixture};

fn write_config(fixture: &MirrorFixture, interval: u64) -> std::path::PathBuf {
    let path = fixture.root().join("dirmirror.toml");
    std::fs::write(
        &path,
        format!(
            "source = \"{}\"\ndestination = \"{}\"\nlog_destination = \"{}\"\ninterval_seconds = {}\n",
            fixture.source().display(),
            fixture.destination().display(),
            fixture.logs().display(),
            interval
        ),
    )
    .unwrap();
    path
}

fn scheduler_from_file(fixture: &MirrorFixture) -> SyncScheduler<LogFileSink, FakeClock> {
    let file = write_config(fixture, 120);
    let partial: PartialConfig = ConfigStore.load(&file).unwrap();
    let config = resolve(partial, &mut NoPrompt).unwrap();
    config.validate().unwrap();

    let applier = TreeDiffApplier::new(&config.source, &config.destination);
    let sink = LogFileSink::new(&config.log_destination).with_echo(false);
    SyncScheduler::new(applier, sink, FakeClock::new(), config.interval()).unwrap()
}

#[test]
fn test_config_to_log_vertical_slice() {
    let fixture = MirrorFixture::new();
    fixture.write_source("a.txt", "hello");
    fixture.write_source("sub/b.txt", "world");
    let mut scheduler = scheduler_from_file(&fixture);

    let first = scheduler.run_passes(1);
    assert!(first[0].is_clean());
    fixture.assert_mirrored();

    fixture.remove_source("a.txt");
    fixture.write_source("sub/b.txt", "world!");
    let second = scheduler.run_passes(1);
    assert_eq!(second[0].removed(), 1);
    assert_eq!(second[0].copied_modified(), 1);
    fixture.assert_mirrored();

    assert_eq!(scheduler.clock().sleeps(), vec![Duration::from_secs(120); 2]);

    let log = fixture.log_contents();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(
        lines.iter().filter(|l| l.ends_with("Synchronization started")).count(),
        2
    );
    assert!(lines.iter().any(|l| l.contains("Abandoned file /a.txt removed")));
    assert!(lines.iter().any(|l| l.contains("Modified file /sub/b.txt copied")));
    assert!(lines.iter().all(|l| !l.contains("ERROR")), "log was:\n{log}");
}

#[test]
fn test_log_accumulates_across_schedulers() {
    let fixture = MirrorFixture::new();
    fixture.write_source("a.txt", "hello");

    scheduler_from_file(&fixture).run_passes(1);
    scheduler_from_file(&fixture).run_passes(1);

    let log = fixture.log_contents();
    assert_eq!(log.matches("Synchronization finished").count(), 2);
    assert_eq!(log.matches("checked, no changes").count(), 1);
}
