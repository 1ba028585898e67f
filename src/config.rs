//! Configuration of the backup behaviour.

use std::path::PathBuf;

use crate::event::Trigger;

/// Lowest retention bound the settings surface allows.
pub const MIN_BACKUPS: u32 = 3;
/// Retention bound used when the settings store carries none.
pub const DEFAULT_MAX_BACKUPS: u32 = 5;
/// Highest retention bound the settings surface allows.
pub const MAX_BACKUPS_LIMIT: u32 = 30;

/// Configuration of one backed-up world.
///
/// Read-only during a backup cycle. Updates coming from the host's settings
/// store are merged with [`BackupConfig::apply`]; there is no shared mutable
/// configuration state.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Gates whether host events do anything.
    pub enabled: bool,

    /// The world folder to archive.
    pub source_path: PathBuf,

    /// Root folder below which the per-world archive folders live.
    pub backup_root: PathBuf,

    /// Retention bound, clamped into `MIN_BACKUPS..=MAX_BACKUPS_LIMIT`.
    pub max_backups: u32,

    /// Host event that fires a backup cycle.
    pub trigger: Trigger,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            source_path: PathBuf::new(),
            backup_root: PathBuf::new(),
            max_backups: DEFAULT_MAX_BACKUPS,
            trigger: Trigger::default(),
        }
    }
}

/// Settings as they arrive from the host's settings store.
///
/// Every field is optional; absent fields keep their previous value.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct RawSettings {
    pub enabled: Option<bool>,
    pub source_path: Option<PathBuf>,
    pub backup_root: Option<PathBuf>,
    pub max_backups: Option<u32>,
    pub trigger: Option<Trigger>,
}

impl BackupConfig {
    /// Merges a settings update over this configuration.
    ///
    /// Pure settings-update function: neither value is mutated. The
    /// retention bound is clamped here so cycles never re-validate it.
    pub fn apply(&self, raw: RawSettings) -> BackupConfig {
        BackupConfig {
            enabled: raw.enabled.unwrap_or(self.enabled),
            source_path: raw
                .source_path
                .unwrap_or_else(|| self.source_path.clone()),
            backup_root: raw
                .backup_root
                .unwrap_or_else(|| self.backup_root.clone()),
            max_backups: raw
                .max_backups
                .unwrap_or(self.max_backups)
                .clamp(MIN_BACKUPS, MAX_BACKUPS_LIMIT),
            trigger: raw.trigger.unwrap_or(self.trigger),
        }
    }
}
