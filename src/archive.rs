//! Archive discovery and member iteration
//!
//! Archives are tarballs (usually gzip-compressed) holding the captured
//! diagnostic output of one machine. Members are streamed in the order the
//! archive stores them and only the ones the record builder recognizes are
//! read into memory.

use anyhow::{Context, Result};
use extract::{Error, RecordBuilder};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How an archive's bytes are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Uncompressed tarball
    Tar,
    /// Gzip-compressed tarball
    TarGz,
}

impl ArchiveKind {
    /// Guess the kind from the file name; anything but `.tar` is read through gzip.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tar") => ArchiveKind::Tar,
            _ => ArchiveKind::TarGz,
        }
    }
}

/// Expand glob patterns into archive paths.
///
/// Directories are skipped, paths matched by several patterns are kept once,
/// and order follows the patterns, then the glob's own ordering.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let entries =
            glob::glob(pattern).with_context(|| format!("Invalid archive pattern: {}", pattern))?;

        let mut matched = 0;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    matched += 1;
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
                Ok(path) => debug!("Skipping non-file {}", path.display()),
                Err(e) => warn!("Cannot read {}: {}", e.path().display(), e.error()),
            }
        }

        if matched == 0 {
            warn!("Pattern {} matched no archives", pattern);
        }
    }

    Ok(paths)
}

/// Identifier used for an archive in records and reports: its file name
pub fn archive_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Feed every recognized member of an archive to the builder.
///
/// Failing to open or decompress the archive, or a structural extraction
/// error, fails the archive. A member whose content cannot be read is
/// skipped.
pub fn read_archive(path: &Path, builder: &mut RecordBuilder<'_>) -> extract::Result<()> {
    let archive_path = path.display().to_string();
    let file = File::open(path).map_err(|e| Error::io(&archive_path, e))?;

    let reader: Box<dyn Read> = match ArchiveKind::from_path(path) {
        ArchiveKind::Tar => Box::new(file),
        ArchiveKind::TarGz => Box::new(GzDecoder::new(file)),
    };
    let mut archive = tar::Archive::new(reader);

    for entry in archive.entries().map_err(|e| Error::io(&archive_path, e))? {
        let mut entry = entry.map_err(|e| Error::io(&archive_path, e))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let member = match entry.path() {
            Ok(p) => p.to_string_lossy().into_owned(),
            Err(e) => {
                warn!("{}: skipping member with unreadable path: {}", archive_path, e);
                continue;
            }
        };
        if !builder.wants(&member) {
            continue;
        }

        let mut content = Vec::new();
        if let Err(e) = entry.read_to_end(&mut content) {
            warn!("{}: cannot read {}: {}", archive_path, member, e);
            continue;
        }

        builder.visit(&member, &content)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::{Inventory, Registry};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    fn tar_bytes(members: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, content) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn write_tgz(dir: &Path, name: &str, members: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(&tar_bytes(members)).unwrap();
        encoder.finish().unwrap();
        path
    }

    const DMIDECODE: &str = "Chassis Information\n\tSerial Number: ABC123\n";

    #[test]
    fn test_archive_kind() {
        assert_eq!(ArchiveKind::from_path(Path::new("a.tar")), ArchiveKind::Tar);
        assert_eq!(ArchiveKind::from_path(Path::new("a.tar.gz")), ArchiveKind::TarGz);
        assert_eq!(ArchiveKind::from_path(Path::new("a.tgz")), ArchiveKind::TarGz);
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name(Path::new("/data/node01.tgz")), "node01.tgz");
    }

    #[test]
    fn test_read_tgz() {
        let dir = TempDir::new().unwrap();
        let path = write_tgz(
            dir.path(),
            "node01.tgz",
            &[
                ("node01/dmidecode", DMIDECODE),
                ("node01/cpuinfo", "physical id : 0\n\nphysical id : 1\n"),
                ("node01/notes.txt", "ignored"),
            ],
        );

        let registry = Registry::standard();
        let mut builder = RecordBuilder::new(&registry, "node01.tgz");
        read_archive(&path, &mut builder).unwrap();
        let record = builder.finish();

        assert_eq!(record.chassis_serial.as_deref(), Some("ABC123"));
        assert_eq!(record.cpus.len(), 2);
    }

    #[test]
    fn test_read_plain_tar() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("node02.tar");
        std::fs::write(&path, tar_bytes(&[("dmidecode", DMIDECODE)])).unwrap();

        let registry = Registry::standard();
        let mut builder = RecordBuilder::new(&registry, "node02.tar");
        read_archive(&path, &mut builder).unwrap();
        assert_eq!(builder.finish().chassis_serial.as_deref(), Some("ABC123"));
    }

    #[test]
    fn test_corrupt_archive_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.tgz");
        std::fs::write(&path, b"definitely not gzip").unwrap();

        let mut inventory = Inventory::default();
        let mut builder = inventory.builder("bad.tgz");
        let err = read_archive(&path, &mut builder).unwrap_err();
        inventory.add_failure("bad.tgz", &err);
        assert_eq!(inventory.failures().len(), 1);
        assert!(inventory.summaries().is_empty());
    }

    #[test]
    fn test_missing_archive_names_its_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.tgz");

        let registry = Registry::standard();
        let mut builder = RecordBuilder::new(&registry, "gone.tgz");
        match read_archive(&path, &mut builder) {
            Err(Error::Io { path: reported, .. }) => {
                assert_eq!(reported, path.display().to_string())
            }
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_lshw_fails_archive() {
        let dir = TempDir::new().unwrap();
        let path = write_tgz(dir.path(), "x.tgz", &[("x/lshw-xml", "<list><node>")]);

        let registry = Registry::standard();
        let mut builder = RecordBuilder::new(&registry, "x.tgz");
        assert!(read_archive(&path, &mut builder).unwrap_err().is_structural());
    }

    #[test]
    fn test_resolve_patterns() {
        let dir = TempDir::new().unwrap();
        write_tgz(dir.path(), "b.tgz", &[("dmidecode", DMIDECODE)]);
        write_tgz(dir.path(), "a.tgz", &[("dmidecode", DMIDECODE)]);
        std::fs::create_dir(dir.path().join("c.tgz")).unwrap();

        let pattern = dir.path().join("*.tgz").display().to_string();
        let paths = resolve_patterns(&[pattern.clone(), pattern]).unwrap();
        let names: Vec<_> = paths.iter().map(|p| archive_name(p)).collect();
        assert_eq!(names, ["a.tgz", "b.tgz"]);

        let none = dir.path().join("*.zip").display().to_string();
        assert!(resolve_patterns(&[none]).unwrap().is_empty());
        assert!(resolve_patterns(&["[".to_string()]).is_err());
    }
}
