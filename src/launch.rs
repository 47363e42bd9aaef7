// SPDX-License-Identifier: MIT

//! Rewrites the game client's launch arguments so the sandboxed JVM only sees
//! paths under the sandbox root.
//!
//! The `rewrite_launch` function is the main entry point.  It takes the raw
//! argument vector handed to the launcher, the real installation directory,
//! the sandbox root and the named pipe path used to talk back to the parent,
//! and returns the argument vector to execute inside the sandbox.  Classpath
//! entries outside of the installation directory are copied into the sandbox
//! as a side effect.

pub mod args;
pub mod classpath;
pub mod command;
pub mod error;
pub mod fs;
pub mod redirect;

pub use args::{ArgumentRewriter, NATIVE_PATH_PROPERTIES, RewriteConfig, RewrittenLaunch};
pub use classpath::{ClasspathRewrite, ClasspathRewriter, StagedEntry};
pub use command::LaunchCommand;
pub use error::{RedirectError, RewriteError, RewriteWarning};
pub use fs::{FileSystem, HostFileSystem};

/// Rewrite the raw launch arguments for the sandbox, using the host
/// filesystem and the default configuration.
///
/// Warnings raised during the rewrite are logged and otherwise dropped; use
/// [`ArgumentRewriter`] directly to inspect them.
pub fn rewrite_launch(
    raw_args: Vec<String>,
    install_root: &str,
    sandbox_root: &str,
    ipc_endpoint: &str,
) -> Result<Vec<String>, RewriteError> {
    let rewriter = ArgumentRewriter::new(RewriteConfig::default(), install_root, sandbox_root);
    rewriter
        .rewrite(&HostFileSystem, raw_args, ipc_endpoint)
        .map(|launch| launch.args)
}
