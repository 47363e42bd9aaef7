// SPDX-License-Identifier: MIT

//! The filesystem operations the classpath rewrite needs.

use std::io::ErrorKind;
use std::path::Path;

/// Filesystem access used when staging classpath entries into the sandbox.
///
/// Paths are passed through exactly as they appear in the launch arguments.
pub trait FileSystem {
    /// True if anything exists at the path.
    fn exists(&self, path: &str) -> bool;

    /// Recursively delete the directory.  A missing directory is not an error.
    fn remove_dir_all(&self, path: &str) -> std::io::Result<()>;

    /// Create the directory and any missing parents.
    fn create_dir_all(&self, path: &str) -> std::io::Result<()>;

    /// Copy a file or a whole directory tree to `target`, replacing any file
    /// already there.
    fn copy(&self, source: &str, target: &str) -> std::io::Result<()>;
}

/// The real filesystem of the machine running the launcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFileSystem;

impl FileSystem for HostFileSystem {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn remove_dir_all(&self, path: &str) -> std::io::Result<()> {
        match fs_err::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn create_dir_all(&self, path: &str) -> std::io::Result<()> {
        fs_err::create_dir_all(path)
    }

    fn copy(&self, source: &str, target: &str) -> std::io::Result<()> {
        copy_tree(Path::new(source), Path::new(target))
    }
}

fn copy_tree(source: &Path, target: &Path) -> std::io::Result<()> {
    if !fs_err::metadata(source)?.is_dir() {
        fs_err::copy(source, target)?;
        return Ok(());
    }
    fs_err::create_dir_all(target)?;
    for entry in fs_err::read_dir(source)? {
        let entry = entry?;
        copy_tree(&entry.path(), &target.join(entry.file_name()))?;
    }
    Ok(())
}
