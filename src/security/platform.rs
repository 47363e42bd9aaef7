// SPDX-License-Identifier: MIT

//! The OS security calls the SID builders rely on.

use super::capability::WellKnownSid;

/// SIDs returned by capability derivation.
#[derive(Debug)]
pub struct DerivedSids<H> {
    pub groups: Vec<H>,
    pub capabilities: Vec<H>,
}

/// Low level SID operations.
///
/// Handles returned by this trait are raw: the caller takes ownership and must
/// pass each one to [`SecurityPlatform::release`] exactly once.  [`Sid`]
/// does this on drop.
///
/// [`Sid`]: super::Sid
pub trait SecurityPlatform: Clone {
    type Handle;

    /// Create the SID for the well-known identity.
    fn create_well_known(&self, kind: WellKnownSid) -> std::io::Result<Self::Handle>;

    /// True if the SID is the given well-known identity.
    fn is_well_known(&self, handle: &Self::Handle, kind: WellKnownSid) -> bool;

    /// Derive the group and capability SIDs for a capability name.
    fn derive_capability_sids(&self, name: &str) -> std::io::Result<DerivedSids<Self::Handle>>;

    /// The `S-1-...` string form of the SID.
    fn display_string(&self, handle: &Self::Handle) -> std::io::Result<String>;

    /// Free the SID.
    ///
    /// # Safety
    ///
    /// `handle` came from this platform and has not been released yet.  Nothing
    /// may use the SID afterwards, including copies of its pointer.
    unsafe fn release(&self, handle: Self::Handle);
}
