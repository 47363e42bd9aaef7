// SPDX-License-Identifier: MIT

//! Owned SIDs.
//! Because the OS requires an explicit free for every SID it hands out,
//! wrapping it in a single struct that implements Drop keeps the release in one place.

use std::fmt;
use std::mem::ManuallyDrop;

use tracing::trace;

use super::capability::{SidCapability, create_capability_sid, create_well_known_sid};
use super::error::SidError;
use super::platform::SecurityPlatform;

/// `SE_GROUP_ENABLED`: the group is enabled for access checks in the token.
pub const SE_GROUP_ENABLED: u32 = 0x0000_0004;

/// A SID owned by this process.
///
/// Not `Clone`: there is only ever one owner, and the SID is released when it
/// is dropped.  Only the builders in this crate wrap handles, so a handle can't
/// end up with two owners:
///
/// ```compile_fail
/// use sandbox_launch::security::{SecurityPlatform, Sid};
///
/// fn wrap<P: SecurityPlatform>(platform: P, handle: P::Handle) -> Sid<P> {
///     Sid::from_raw(platform, handle)
/// }
/// ```
pub struct Sid<P: SecurityPlatform> {
    platform: P,
    handle: ManuallyDrop<P::Handle>,
}

impl<P: SecurityPlatform> Sid<P> {
    /// Take ownership of a handle the platform returned.  The handle must not
    /// be owned by anything else.
    pub(crate) fn from_raw(platform: P, handle: P::Handle) -> Self {
        Self {
            platform,
            handle: ManuallyDrop::new(handle),
        }
    }

    pub fn handle(&self) -> &P::Handle {
        &self.handle
    }

    /// The `S-1-...` string form.
    pub fn to_sid_string(&self) -> Result<String, SidError> {
        self.platform
            .display_string(&self.handle)
            .map_err(|source| SidError::DisplayString { source })
    }
}

impl<P: SecurityPlatform> fmt::Display for Sid<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_sid_string() {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("Invalid SID"),
        }
    }
}

impl<P: SecurityPlatform> fmt::Debug for Sid<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sid").field(&format_args!("{self}")).finish()
    }
}

impl<P: SecurityPlatform> Drop for Sid<P> {
    fn drop(&mut self) {
        // SAFETY: drop runs at most once, and the handle is not touched afterwards.
        let handle = unsafe { ManuallyDrop::take(&mut self.handle) };
        trace!("releasing SID");
        // SAFETY: handles only reach `from_raw` straight from the platform, so
        // this is the single owner.
        unsafe { self.platform.release(handle) };
    }
}

/// A SID plus the group attributes it is added to a restricted token with.
#[derive(Debug)]
pub struct SidAndAttributes<P: SecurityPlatform> {
    sid: Sid<P>,
    attributes: u32,
}

impl<P: SecurityPlatform> SidAndAttributes<P> {
    /// Wrap the SID as an enabled group.
    pub fn new(sid: Sid<P>) -> Self {
        Self { sid, attributes: SE_GROUP_ENABLED }
    }

    /// Create the SID for the capability request and wrap it as an enabled group.
    pub fn with_capability(platform: &P, request: &SidCapability) -> Result<Self, SidError> {
        let sid = match request {
            SidCapability::WellKnown(kind) => create_well_known_sid(platform, *kind)?,
            SidCapability::Named(name) => create_capability_sid(platform, name)?,
        };
        Ok(Self::new(sid))
    }

    pub fn sid(&self) -> &Sid<P> {
        &self.sid
    }

    pub fn attributes(&self) -> u32 {
        self.attributes
    }

    pub fn into_sid(self) -> Sid<P> {
        self.sid
    }
}
