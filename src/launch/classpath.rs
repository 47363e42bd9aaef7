// SPDX-License-Identifier: MIT

//! Rewrites the `-classpath` value so every entry is reachable from inside the sandbox.
//!
//! Entries under the installation directory are mounted into the sandbox by
//! the filesystem virtualization layer, so only their paths change.  Anything
//! else (usually a local build output in a development environment) is copied
//! into an overflow directory inside the sandbox.

use tracing::{debug, warn};

use super::error::{RewriteError, RewriteWarning};
use super::fs::FileSystem;
use super::redirect;

/// Separates entries in a Windows classpath.
pub const CLASSPATH_SEPARATOR: &str = ";";

/// Directory under the sandbox root that receives out-of-tree entries.
pub const OVERFLOW_DIR: &str = ".classpath";

/// Build tools split one source set into `classes/.../main` and `resources/main`.
/// Both would be staged as `main`, so the resources side is renamed.
const RESOURCES_DIR: &str = "resources";

/// An out-of-tree entry that was copied into the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    pub source: String,
    pub target: String,
}

/// The result of rewriting one classpath value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClasspathRewrite {
    pub classpath: String,
    pub staged: Vec<StagedEntry>,
    pub warnings: Vec<RewriteWarning>,
}

pub struct ClasspathRewriter<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    install_root: &'a str,
    sandbox_root: &'a str,
}

impl<'a, F: FileSystem + ?Sized> ClasspathRewriter<'a, F> {
    pub fn new(fs: &'a F, install_root: &'a str, sandbox_root: &'a str) -> Self {
        Self { fs, install_root, sandbox_root }
    }

    /// The directory out-of-tree entries are staged in.
    pub fn overflow_dir(&self) -> String {
        redirect::join(self.sandbox_root, OVERFLOW_DIR)
    }

    /// Rewrite the classpath, staging out-of-tree entries as a side effect.
    /// Entry order is kept, as it is the class load order.
    pub fn rewrite(&self, classpath: &str) -> Result<ClasspathRewrite, RewriteError> {
        let overflow_dir = self.overflow_dir();
        // Stale copies from an earlier launch must not leak into this one.
        self.fs
            .remove_dir_all(&overflow_dir)
            .map_err(|error| RewriteError::ResetOverflow { path: overflow_dir.clone(), error })?;
        let mut overflow_created = false;

        let mut result = ClasspathRewrite::default();
        let mut entries = Vec::new();
        for entry in classpath.split(CLASSPATH_SEPARATOR).filter(|e| !e.is_empty()) {
            if !self.fs.exists(entry) {
                let warning = RewriteWarning::MissingClasspathEntry { entry: entry.to_string() };
                warn!("{warning}");
                result.warnings.push(warning);
                continue;
            }

            // Entries outside of the install tree can't be remapped, and are staged instead.
            match redirect::remap(entry, self.install_root, self.sandbox_root) {
                Ok(sandbox_path) => {
                    debug!(entry, %sandbox_path, "remapped classpath entry");
                    entries.push(sandbox_path);
                }
                Err(_) => {
                    if !overflow_created {
                        self.fs.create_dir_all(&overflow_dir).map_err(|error| {
                            RewriteError::ResetOverflow { path: overflow_dir.clone(), error }
                        })?;
                        overflow_created = true;
                    }
                    let staged = self.stage(entry, &overflow_dir)?;
                    entries.push(staged.target.clone());
                    result.staged.push(staged);
                }
            }
        }

        result.classpath = entries.join(CLASSPATH_SEPARATOR);
        Ok(result)
    }

    fn stage(&self, entry: &str, overflow_dir: &str) -> Result<StagedEntry, RewriteError> {
        let name = if redirect::parent_name(entry) == Some(RESOURCES_DIR) {
            RESOURCES_DIR
        } else {
            redirect::file_name(entry).unwrap_or(entry)
        };
        let target = redirect::join(overflow_dir, name);

        warn!("Copying classpath entry to sandbox: {entry} -> {target}");
        self.fs.copy(entry, &target).map_err(|error| RewriteError::FileCopy {
            source_path: entry.to_string(),
            target: target.clone(),
            error,
        })?;

        Ok(StagedEntry { source: entry.to_string(), target })
    }
}
