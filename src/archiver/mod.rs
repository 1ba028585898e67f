//! The retention-bounded archiver.
//!
//! One cycle archives the whole world folder into
//! `backup_root/<world>/<world>_backup_<timestamp>.zip` and evicts the
//! oldest archive once the retention bound is reached. The filesystem is
//! the only store of truth: archives are discovered by listing the archive
//! folder, ordered by their filenames.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use derive_more::{Display, Error, From};
use walkdir::WalkDir;

pub mod compress;

/// Suffix of finished archives, also the enumeration filter.
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Timestamp format embedded in archive filenames.
///
/// All fields are fixed-width and zero-padded, so lexicographic order on
/// the formatted string equals chronological order. Eviction relies on
/// this: the sorted file listing replaces any stored metadata.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// The configuration is incomplete for a backup cycle.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No path to the world folder has been configured.
    #[display("no world folder configured")]
    MissingSource,
    /// No backup folder has been configured.
    #[display("no backup folder configured")]
    MissingDestination,
}

/// Filesystem operation a cycle was performing when it failed.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum FsOperation {
    #[display("creating the archive folder")]
    CreateDir,
    #[display("listing existing archives")]
    List,
    #[display("deleting the oldest archive")]
    Evict,
    #[display("writing the archive")]
    Compress,
}

/// Errors of a single backup cycle.
///
/// All errors are terminal for the cycle; nothing is retried. A later
/// trigger simply runs a fresh cycle.
#[derive(Debug, Display, Error, From)]
pub enum BackupError {
    /// The configuration is incomplete; the cycle was a no-op.
    #[from]
    Config(ConfigError),

    /// A filesystem operation failed and aborted the rest of the cycle.
    #[display("{operation} failed for {}: {source}", path.display())]
    Filesystem {
        operation: FsOperation,
        path: PathBuf,
        source: io::Error,
    },
}

impl BackupError {
    fn fs(operation: FsOperation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Lists finished archives below `dir`, oldest first.
///
/// The listing is recursive and keeps only files ending in
/// [`ARCHIVE_SUFFIX`]. Sorting is lexicographic on the full path, which
/// [`TIMESTAMP_FORMAT`] makes chronological.
pub fn list_archives(dir: &Path) -> Result<Vec<PathBuf>, BackupError> {
    let mut archives = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf());
            BackupError::fs(FsOperation::List, path, e.into())
        })?;

        if entry.file_type().is_file()
            && entry.file_name().to_string_lossy().ends_with(ARCHIVE_SUFFIX)
        {
            archives.push(entry.into_path());
        }
    }
    archives.sort();

    Ok(archives)
}

/// Runs one backup cycle stamped with the current local time.
///
/// See [`run_backup_cycle_at`] for the cycle itself.
pub fn run_backup_cycle(
    source_path: &Path,
    backup_root: &Path,
    max_backups: u32,
) -> Result<PathBuf, BackupError> {
    run_backup_cycle_at(source_path, backup_root, max_backups, Local::now().naive_local())
}

/// Runs one backup cycle with a caller-chosen timestamp.
///
/// The world folder is archived to
/// `backup_root/<world>/<world>_backup_<stamp>.zip`; if the archive folder
/// already holds `max_backups` archives the oldest one is deleted first.
/// A failed deletion aborts the cycle before the new archive is written,
/// so a completed cycle never leaves more than `max_backups` archives.
///
/// `max_backups` is expected to be clamped by the configuration layer. A
/// value of zero leaves no retention slack: the oldest archive is evicted
/// before every addition.
pub fn run_backup_cycle_at(
    source_path: &Path,
    backup_root: &Path,
    max_backups: u32,
    stamp: NaiveDateTime,
) -> Result<PathBuf, BackupError> {
    if source_path.as_os_str().is_empty() {
        return Err(ConfigError::MissingSource.into());
    }
    if backup_root.as_os_str().is_empty() {
        return Err(ConfigError::MissingDestination.into());
    }

    let world_name = source_path
        .file_name()
        .ok_or(ConfigError::MissingSource)?
        .to_string_lossy()
        .into_owned();
    let archive_dir = backup_root.join(&world_name);

    fs::create_dir_all(&archive_dir)
        .map_err(|e| BackupError::fs(FsOperation::CreateDir, &archive_dir, e))?;

    let archives = list_archives(&archive_dir)?;
    if archives.len() as u64 >= u64::from(max_backups) {
        // At most one eviction per cycle: cycles add one archive each, so
        // the count never overshoots the bound by more than one.
        if let Some(oldest) = archives.first() {
            fs::remove_file(oldest)
                .map_err(|e| BackupError::fs(FsOperation::Evict, oldest, e))?;
            log::info!(target: "archiver", "Deleted oldest backup: {}", oldest.display());
        }
    }

    let timestamp = stamp.format(TIMESTAMP_FORMAT);
    let stem = archive_dir.join(format!("{world_name}_backup_{timestamp}"));
    log::debug!(
        target: "archiver",
        "Archiving {} to {}{ARCHIVE_SUFFIX}",
        source_path.display(),
        stem.display()
    );

    compress::compress_dir(source_path, &stem)
        .map_err(|e| BackupError::fs(FsOperation::Compress, &stem, e))
}
