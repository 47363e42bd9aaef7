// SPDX-License-Identifier: MIT

//! Errors and warnings raised while rewriting the launch arguments.

/// A path was expected to live under a root directory, but doesn't.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedirectError {
    #[error("{path} is not inside {root}")]
    NotDescendant { path: String, root: String },
}

/// Failures that abort the whole launch rewrite.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("failed to copy classpath entry {source_path} to {target}")]
    FileCopy {
        source_path: String,
        target: String,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to reset the classpath overflow directory {path}")]
    ResetOverflow {
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("could not find the application {name} on the PATH")]
    UnresolvedApplication {
        name: String,
        #[source]
        error: which::Error,
    },
}

/// Conditions that degrade the rewritten launch without stopping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteWarning {
    /// A classpath entry pointed at a file that doesn't exist, and was dropped.
    MissingClasspathEntry { entry: String },
    /// No `-D` argument was found, so the sandbox-only properties were not added.
    NoInjectionPoint,
    /// A flag that takes a value was the last argument, and was left as is.
    MissingFlagValue { flag: String },
}

impl std::fmt::Display for RewriteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingClasspathEntry { entry } => {
                write!(f, "classpath entry does not exist: {entry}")
            }
            Self::NoInjectionPoint => f.write_str(
                "failed to find any JVM arguments, sandbox may not work correctly",
            ),
            Self::MissingFlagValue { flag } => write!(f, "argument {flag} has no value"),
        }
    }
}
