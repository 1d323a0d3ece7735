//! The Archive Codec collaborator: bundles a set of files and folders into a
//! single opaque byte blob (a zip container), and recovers them again.
//!
//! Grounded on the original `vfs.py` collaborator: files are stored under
//! their basename, folders recursively under `basename(folder)/relpath`,
//! dot-prefixed entries are skipped, and every entry name is checked against
//! absolute and parent-traversal paths before a single byte is written to
//! disk during unpacking.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::error::{StegError, StegResult};

/// The kind of a listed archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
    Other,
}

/// A single entry in a listed archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

/// Packs the given files and folders into a single zip blob.
///
/// Each file is stored under its own basename; each folder is walked
/// recursively and stored under `basename(folder)/relative/path`. Entries
/// whose name (anywhere in the path) starts with `.` are skipped. Inputs
/// that don't exist, or aren't the kind claimed, are logged and skipped
/// rather than failing the whole pack. An empty result (no inputs found) is
/// not an error.
pub fn pack_vfs(files: &[PathBuf], folders: &[PathBuf]) -> StegResult<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for file in files {
            if !file.is_file() {
                warn!("pack_vfs: skipping missing file {}", file.display());
                continue;
            }
            let name = match file.file_name().and_then(|n| n.to_str()) {
                Some(n) => n,
                None => {
                    warn!("pack_vfs: skipping file with unreadable name {}", file.display());
                    continue;
                }
            };
            zip.start_file(name, options)?;
            let mut fd = fs::File::open(file)?;
            std::io::copy(&mut fd, &mut zip)?;
        }

        for folder in folders {
            if !folder.is_dir() {
                warn!("pack_vfs: skipping missing folder {}", folder.display());
                continue;
            }
            let base_name = match folder.file_name().and_then(|n| n.to_str()) {
                Some(n) => n,
                None => {
                    warn!("pack_vfs: skipping folder with unreadable name {}", folder.display());
                    continue;
                }
            };

            for entry in WalkDir::new(folder)
                .into_iter()
                .filter_entry(|e| !is_hidden(e.file_name().to_str().unwrap_or("")))
            {
                let entry = entry.map_err(|e| {
                    StegError::Io(
                        e.into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("walkdir traversal failed")),
                    )
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry.path().strip_prefix(folder).unwrap_or(entry.path());
                let archive_path = PathBuf::from(base_name).join(relative);
                let archive_name = archive_path.to_string_lossy().replace('\\', "/");

                zip.start_file(&archive_name, options)?;
                let mut fd = fs::File::open(entry.path())?;
                std::io::copy(&mut fd, &mut zip)?;
            }
        }

        zip.finish()?;
    }
    Ok(buffer)
}

/// Extracts every entry in `blob` into `dest_dir`, creating it if needed.
///
/// Every entry name is validated before anything is written: names that
/// begin with `/` or `\`, or contain a `..` path segment, abort the whole
/// extraction with [`StegError::UnsafeArchivePath`] and leave `dest_dir`
/// untouched (beyond its own creation).
pub fn unpack_vfs(blob: &[u8], dest_dir: &Path) -> StegResult<()> {
    let mut archive = ZipArchive::new(Cursor::new(blob))?;

    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        check_safe_path(file.name())?;
    }

    fs::create_dir_all(dest_dir)?;
    archive.extract(dest_dir)?;
    Ok(())
}

/// Lists the entries contained in `blob` without extracting anything.
pub fn list_vfs(blob: &[u8]) -> StegResult<Vec<Entry>> {
    let mut archive = ZipArchive::new(Cursor::new(blob))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        let kind = if file.is_dir() {
            EntryKind::Folder
        } else if file.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        entries.push(Entry {
            name: file.name().to_string(),
            kind,
        });
    }

    Ok(entries)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn check_safe_path(name: &str) -> StegResult<()> {
    if name.starts_with('/') || name.starts_with('\\') {
        return Err(StegError::UnsafeArchivePath(format!(
            "entry '{}' has an absolute path",
            name
        )));
    }
    if name.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(StegError::UnsafeArchivePath(format!(
            "entry '{}' contains a parent-directory segment",
            name
        )));
    }
    Ok(())
}
