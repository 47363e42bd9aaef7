// SPDX-License-Identifier: MIT

//! # sandbox-launch
//!
//! Prepares a modded Java game client for launch inside a sandbox.  Two
//! artifacts are produced before the restricted process is spawned:
//!
//! * the rewritten launch arguments, where every path the client touches
//!   resolves inside the sandbox root ([`launch`]), and
//! * the capability SIDs attached to the restricted token ([`security`]).

pub mod launch;
pub mod security;

#[cfg(test)]
mod testing;

pub use launch::{
    ArgumentRewriter, FileSystem, HostFileSystem, LaunchCommand, RewriteConfig, RewriteError,
    RewriteWarning, RewrittenLaunch, rewrite_launch,
};
pub use security::{SecurityPlatform, Sid, SidAndAttributes, SidCapability, SidError, WellKnownSid};

#[cfg(target_os = "windows")]
pub use security::{Win32Security, build_capability_identity};
