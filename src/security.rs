// SPDX-License-Identifier: MIT

//! Builds the SIDs attached to the sandboxed process's restricted token.
//!
//! Each requested capability is either a well-known SID (like `Everyone`) or
//! a named AppContainer capability (like `internetClient`).  Both become an
//! owned [`Sid`], which releases the underlying OS allocation exactly once when
//! dropped, wrapped in a [`SidAndAttributes`] ready for the token's group list.
//!
//! The OS calls live behind the [`SecurityPlatform`] trait.  On Windows,
//! [`Win32Security`] is the real implementation.

pub mod capability;
pub mod error;
pub mod platform;
pub mod sid;

#[cfg(target_os = "windows")]
mod win32;

pub use capability::{
    INTERNET_CLIENT, SidCapability, WellKnownSid, build_capability_group, create_capability_sid,
    create_well_known_sid,
};
pub use error::{SidCreationStep, SidError};
pub use platform::{DerivedSids, SecurityPlatform};
pub use sid::{SE_GROUP_ENABLED, Sid, SidAndAttributes};

#[cfg(target_os = "windows")]
pub use win32::{Win32Security, Win32Sid, raw_group_list};

/// Build the token group entry for one capability request, using the
/// Windows security subsystem.
#[cfg(target_os = "windows")]
pub fn build_capability_identity(
    request: &SidCapability,
) -> Result<SidAndAttributes<Win32Security>, SidError> {
    SidAndAttributes::with_capability(&Win32Security, request)
}
