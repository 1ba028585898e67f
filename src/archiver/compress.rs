//! Zip compression of a whole directory tree.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ARCHIVE_SUFFIX;

/// Compresses the directory tree at `source` into `<dest_stem>.zip`.
///
/// Entry names are relative to `source` with forward slashes, so the
/// archive extracts to the same layout on any platform. Empty directories
/// are kept; symlinks and other special files are skipped. Returns the
/// path of the finished archive.
pub fn compress_dir(source: &Path, dest_stem: &Path) -> io::Result<PathBuf> {
    let mut archive_path = OsString::from(dest_stem.as_os_str());
    archive_path.push(ARCHIVE_SUFFIX);
    let archive_path = PathBuf::from(archive_path);

    let archive_file = File::create_new(&archive_path)?;
    let mut writer = ZipWriter::new(archive_file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .expect("walked paths are below the source");
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options).map_err(io::Error::other)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, options).map_err(io::Error::other)?;
            let mut file = File::open(entry.path())?;
            io::copy(&mut file, &mut writer)?;
        }
    }

    writer.finish().map_err(io::Error::other)?;

    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    #[test]
    fn nested_files_survive_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let world = tmp.path().join("world");
        fs::create_dir_all(world.join("sub")).unwrap();
        fs::write(world.join("a.txt"), b"alpha").unwrap();
        fs::write(world.join("sub").join("b.txt"), b"beta").unwrap();

        let stem = tmp.path().join("world_backup_2024-01-01_00-00-00");
        let archive = compress_dir(&world, &stem).unwrap();
        assert!(archive.to_string_lossy().ends_with(ARCHIVE_SUFFIX));

        let mut zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();

        let mut a = Vec::new();
        zip.by_name("a.txt").unwrap().read_to_end(&mut a).unwrap();
        assert_eq!(a, b"alpha");

        let mut b = Vec::new();
        zip.by_name("sub/b.txt").unwrap().read_to_end(&mut b).unwrap();
        assert_eq!(b, b"beta");
    }

    #[test]
    fn empty_directories_are_kept() {
        let tmp = TempDir::new().unwrap();
        let world = tmp.path().join("world");
        fs::create_dir_all(world.join("empty")).unwrap();

        let stem = tmp.path().join("world_backup_2024-01-01_00-00-00");
        let archive = compress_dir(&world, &stem).unwrap();

        let zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        assert!(zip.file_names().any(|n| n == "empty/"));
    }

    #[test]
    fn refuses_to_clobber_an_existing_archive() {
        let tmp = TempDir::new().unwrap();
        let world = tmp.path().join("world");
        fs::create_dir(&world).unwrap();

        let stem = tmp.path().join("world_backup_2024-01-01_00-00-00");
        fs::write(tmp.path().join("world_backup_2024-01-01_00-00-00.zip"), b"").unwrap();

        assert!(compress_dir(&world, &stem).is_err());
    }
}
