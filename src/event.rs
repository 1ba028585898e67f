//! Host events and their dispatch onto backup cycles.
//!
//! The host application delivers payload-free named events. The dispatcher
//! translates a matching event into exactly one synchronous [`archiver`]
//! cycle and keeps the archiver free of any host specifics.

use std::str::FromStr;

use clap::ValueEnum;
use derive_more::{Display, Error};

use crate::archiver;
use crate::config::BackupConfig;

/// Events delivered by the host application.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum HostEvent {
    /// The host stopped streaming.
    StreamingStopped,
    /// The host stopped recording.
    RecordingStopped,
}

/// Host event selected to fire a backup cycle.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Display, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    /// Back up when streaming stops.
    #[display("stream-stop")]
    StreamStop,
    /// Back up when recording stops. (Default)
    #[default]
    #[display("record-stop")]
    RecordStop,
}

/// Trigger name is unknown.
#[derive(Debug, Display, Error)]
#[display("unknown trigger: {_0}")]
pub struct UnknownTrigger(#[error(ignore)] String);

impl FromStr for Trigger {
    type Err = UnknownTrigger;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stream-stop" => Ok(Self::StreamStop),
            "record-stop" => Ok(Self::RecordStop),
            other => Err(UnknownTrigger(other.to_string())),
        }
    }
}

impl Trigger {
    /// Returns if `event` is the one this trigger fires on.
    pub fn matches(self, event: HostEvent) -> bool {
        matches!(
            (self, event),
            (Self::StreamStop, HostEvent::StreamingStopped)
                | (Self::RecordStop, HostEvent::RecordingStopped)
        )
    }
}

/// Delivers one host event, running at most one backup cycle.
///
/// Outcomes are reported through the log sink only; the host callback does
/// not expect a return value and errors never propagate back to it.
pub fn dispatch(config: &BackupConfig, event: HostEvent) {
    if !config.enabled {
        log::debug!(target: "event", "Backups are disabled, ignoring {event:?}");
        return;
    }
    if !config.trigger.matches(event) {
        log::trace!(
            target: "event",
            "{event:?} does not match the configured trigger '{}'",
            config.trigger
        );
        return;
    }

    match archiver::run_backup_cycle(&config.source_path, &config.backup_root, config.max_backups)
    {
        Ok(archive) => {
            log::info!(target: "event", "World backup created: {}", archive.display());
        }
        Err(e) => log::warn!(target: "event", "World backup failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn enabled_config(source: PathBuf, root: PathBuf, trigger: Trigger) -> BackupConfig {
        BackupConfig {
            enabled: true,
            source_path: source,
            backup_root: root,
            max_backups: 5,
            trigger,
        }
    }

    #[test]
    fn trigger_matches_its_event_only() {
        assert!(Trigger::StreamStop.matches(HostEvent::StreamingStopped));
        assert!(Trigger::RecordStop.matches(HostEvent::RecordingStopped));
        assert!(!Trigger::StreamStop.matches(HostEvent::RecordingStopped));
        assert!(!Trigger::RecordStop.matches(HostEvent::StreamingStopped));
    }

    #[test]
    fn trigger_names_round_trip() {
        for trigger in [Trigger::StreamStop, Trigger::RecordStop] {
            assert_eq!(trigger.to_string().parse::<Trigger>().unwrap(), trigger);
        }
        assert!("on-exit".parse::<Trigger>().is_err());
    }

    #[test]
    fn matching_event_creates_an_archive() {
        let tmp = TempDir::new().unwrap();
        let world = tmp.path().join("world");
        fs::create_dir(&world).unwrap();
        fs::write(world.join("level.dat"), b"data").unwrap();
        let root = tmp.path().join("backups");

        let config = enabled_config(world, root.clone(), Trigger::RecordStop);
        dispatch(&config, HostEvent::RecordingStopped);

        let archives: Vec<_> = fs::read_dir(root.join("world"))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(archives.len(), 1);
    }

    #[test]
    fn non_matching_event_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let world = tmp.path().join("world");
        fs::create_dir(&world).unwrap();
        let root = tmp.path().join("backups");

        let config = enabled_config(world, root.clone(), Trigger::StreamStop);
        dispatch(&config, HostEvent::RecordingStopped);

        assert!(!root.exists());
    }

    #[test]
    fn disabled_config_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let world = tmp.path().join("world");
        fs::create_dir(&world).unwrap();
        let root = tmp.path().join("backups");

        let mut config = enabled_config(world, root.clone(), Trigger::RecordStop);
        config.enabled = false;
        dispatch(&config, HostEvent::RecordingStopped);

        assert!(!root.exists());
    }
}
