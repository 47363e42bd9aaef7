// SPDX-License-Identifier: MIT

//! Capability requests, and the SIDs they resolve to.

use std::io::ErrorKind;

use tracing::debug;

use super::error::{SidCreationStep, SidError};
use super::platform::SecurityPlatform;
use super::sid::{Sid, SidAndAttributes};

/// Capability granting outbound network access.
pub const INTERNET_CLIENT: &str = "internetClient";

/// The well-known SIDs a sandboxed launch asks for.  `Other` passes a raw
/// `WELL_KNOWN_SID_TYPE` value through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownSid {
    Null,
    World,
    Interactive,
    AuthenticatedUser,
    RestrictedCode,
    LocalSystem,
    BuiltinAdministrators,
    BuiltinUsers,
    UntrustedLabel,
    LowLabel,
    MediumLabel,
    BuiltinAnyPackage,
    Other(i32),
}

/// One capability to grant the sandboxed process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SidCapability {
    WellKnown(WellKnownSid),
    /// An AppContainer capability name, such as [`INTERNET_CLIENT`].
    Named(String),
}

impl SidCapability {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl From<WellKnownSid> for SidCapability {
    fn from(kind: WellKnownSid) -> Self {
        Self::WellKnown(kind)
    }
}

/// Create a well-known SID, and check that the OS agrees it is that SID.
pub fn create_well_known_sid<P: SecurityPlatform>(
    platform: &P,
    kind: WellKnownSid,
) -> Result<Sid<P>, SidError> {
    let handle = platform.create_well_known(kind).map_err(|source| SidError::CreationFailed {
        step: SidCreationStep::CreateWellKnown,
        source,
    })?;
    // Owned from here on, so a failed check still releases it.
    let sid = Sid::from_raw(platform.clone(), handle);

    if !platform.is_well_known(sid.handle(), kind) {
        return Err(SidError::CreationFailed {
            step: SidCreationStep::ValidateWellKnown,
            source: std::io::Error::new(
                ErrorKind::InvalidData,
                format!("created SID is not {kind:?}"),
            ),
        });
    }
    debug!(?kind, %sid, "created well-known SID");
    Ok(sid)
}

/// Derive the capability SID for a capability name.
///
/// The derivation must produce exactly one capability SID.  The group SIDs it
/// also produces are never needed, and are released right away.
pub fn create_capability_sid<P: SecurityPlatform>(
    platform: &P,
    name: &str,
) -> Result<Sid<P>, SidError> {
    let derived = platform
        .derive_capability_sids(name)
        .map_err(|source| SidError::CapabilityDerivation { name: name.to_string(), source })?;

    for group in derived.groups {
        // SAFETY: fresh from the derivation and never wrapped.
        unsafe { platform.release(group) };
    }

    let capabilities: Vec<Sid<P>> = derived
        .capabilities
        .into_iter()
        .map(|handle| Sid::from_raw(platform.clone(), handle))
        .collect();
    let [sid]: [Sid<P>; 1] = capabilities.try_into().map_err(|rejected: Vec<Sid<P>>| {
        SidError::AmbiguousOrUnsupportedCapability {
            name: name.to_string(),
            count: rejected.len(),
        }
    })?;

    debug!(name, %sid, "derived capability SID");
    Ok(sid)
}

/// Build the group entries for every requested capability.  If any of them
/// fails, the SIDs already created are released before the error returns.
pub fn build_capability_group<P: SecurityPlatform>(
    platform: &P,
    requests: &[SidCapability],
) -> Result<Vec<SidAndAttributes<P>>, SidError> {
    requests
        .iter()
        .map(|request| SidAndAttributes::with_capability(platform, request))
        .collect()
}
