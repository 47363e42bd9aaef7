// SPDX-License-Identifier: MIT

//! SID calls against the Windows security subsystem.

mod conv;

use std::ffi::OsStr;

use windows::Win32::Foundation::{HLOCAL, LocalFree};
use windows::Win32::Security::{self, PSID, SID_AND_ATTRIBUTES, WELL_KNOWN_SID_TYPE};
use windows::core::PCWSTR;

use super::capability::WellKnownSid;
use super::platform::{DerivedSids, SecurityPlatform};
use super::sid::SidAndAttributes;
use conv::{from_wide_nul, io_error, to_wide_nul};

/// A SID handed out by Windows.  Only [`Win32Security`] creates these.
#[derive(Debug)]
pub struct Win32Sid(Storage);

#[derive(Debug)]
enum Storage {
    /// Filled in by `CreateWellKnownSid` into memory this process owns.
    Buffer(Vec<u8>),
    /// Allocated by Windows; freed with `LocalFree`.
    Local(PSID),
}

impl Win32Sid {
    /// The SID pointer.  Only valid while `self` is alive.
    pub fn as_psid(&self) -> PSID {
        match &self.0 {
            Storage::Buffer(buf) => PSID(buf.as_ptr() as *mut _),
            Storage::Local(sid) => *sid,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Security;

impl SecurityPlatform for Win32Security {
    type Handle = Win32Sid;

    fn create_well_known(&self, kind: WellKnownSid) -> std::io::Result<Win32Sid> {
        // SECURITY_MAX_SID_SIZE is an upper bound for every SID.
        let mut sid_buf = vec![0u8; Security::SECURITY_MAX_SID_SIZE as usize];
        let mut sid_size = sid_buf.len() as u32;
        unsafe {
            Security::CreateWellKnownSid(
                sid_type(kind),
                None, // only domain-relative SIDs need the domain
                Some(PSID(sid_buf.as_mut_ptr() as _)),
                &mut sid_size,
            )
        }
        .map_err(io_error)?;

        // Shrink to the actual SID size returned.
        sid_buf.truncate(sid_size as usize);
        Ok(Win32Sid(Storage::Buffer(sid_buf)))
    }

    fn is_well_known(&self, handle: &Win32Sid, kind: WellKnownSid) -> bool {
        unsafe { Security::IsWellKnownSid(handle.as_psid(), sid_type(kind)) }.as_bool()
    }

    fn derive_capability_sids(&self, name: &str) -> std::io::Result<DerivedSids<Win32Sid>> {
        let name = to_wide_nul(OsStr::new(name));
        let mut group_sids: *mut PSID = std::ptr::null_mut();
        let mut group_count: u32 = 0;
        let mut capability_sids: *mut PSID = std::ptr::null_mut();
        let mut capability_count: u32 = 0;

        unsafe {
            Security::DeriveCapabilitySidsFromName(
                PCWSTR(name.as_ptr()),
                &mut group_sids,
                &mut group_count,
                &mut capability_sids,
                &mut capability_count,
            )
            .map_err(io_error)?;

            Ok(DerivedSids {
                groups: take_sid_array(group_sids, group_count),
                capabilities: take_sid_array(capability_sids, capability_count),
            })
        }
    }

    fn display_string(&self, handle: &Win32Sid) -> std::io::Result<String> {
        // The windows crate doesn't cover this one.
        // Windows creates the string in a buffer that then needs to be freed.
        let mut buf_ptr: *mut u16 = std::ptr::null_mut();
        let result = unsafe {
            winapi::shared::sddl::ConvertSidToStringSidW(handle.as_psid().0 as _, &mut buf_ptr)
        };
        if result == 0 {
            return Err(std::io::Error::last_os_error());
        }

        let s = unsafe { from_wide_nul(buf_ptr) };
        unsafe { winapi::um::winbase::LocalFree(buf_ptr as *mut _) };
        Ok(s.to_string_lossy().into_owned())
    }

    unsafe fn release(&self, handle: Win32Sid) {
        match handle.0 {
            Storage::Buffer(_) => (),
            Storage::Local(sid) => {
                let _ = unsafe { LocalFree(Some(HLOCAL(sid.0))) };
            }
        }
    }
}

/// Move the SIDs out of a `LocalAlloc`ed array, then free the array itself.
///
/// # Safety
///
/// `array` is null, or points to `count` SIDs allocated by Windows.
unsafe fn take_sid_array(array: *mut PSID, count: u32) -> Vec<Win32Sid> {
    if array.is_null() {
        return vec![];
    }
    let sids = unsafe { std::slice::from_raw_parts(array, count as usize) }
        .iter()
        .map(|sid| Win32Sid(Storage::Local(*sid)))
        .collect();
    let _ = unsafe { LocalFree(Some(HLOCAL(array.cast()))) };
    sids
}

fn sid_type(kind: WellKnownSid) -> WELL_KNOWN_SID_TYPE {
    match kind {
        WellKnownSid::Null => Security::WinNullSid,
        WellKnownSid::World => Security::WinWorldSid,
        WellKnownSid::Interactive => Security::WinInteractiveSid,
        WellKnownSid::AuthenticatedUser => Security::WinAuthenticatedUserSid,
        WellKnownSid::RestrictedCode => Security::WinRestrictedCodeSid,
        WellKnownSid::LocalSystem => Security::WinLocalSystemSid,
        WellKnownSid::BuiltinAdministrators => Security::WinBuiltinAdministratorsSid,
        WellKnownSid::BuiltinUsers => Security::WinBuiltinUsersSid,
        WellKnownSid::UntrustedLabel => Security::WinUntrustedLabelSid,
        WellKnownSid::LowLabel => Security::WinLowLabelSid,
        WellKnownSid::MediumLabel => Security::WinMediumLabelSid,
        WellKnownSid::BuiltinAnyPackage => Security::WinBuiltinAnyPackageSid,
        WellKnownSid::Other(value) => WELL_KNOWN_SID_TYPE(value),
    }
}

impl SidAndAttributes<Win32Security> {
    /// The entry for a token group list.  The SID pointer borrows from `self`,
    /// so `self` must outlive any use of the returned structure.
    pub fn as_raw(&self) -> SID_AND_ATTRIBUTES {
        SID_AND_ATTRIBUTES {
            Sid: self.sid().handle().as_psid(),
            Attributes: self.attributes(),
        }
    }
}

/// The raw group list, for `SECURITY_CAPABILITIES` or `CreateRestrictedToken`.
pub fn raw_group_list(entries: &[SidAndAttributes<Win32Security>]) -> Vec<SID_AND_ATTRIBUTES> {
    entries.iter().map(SidAndAttributes::as_raw).collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::{INTERNET_CLIENT, SE_GROUP_ENABLED, SidCapability, build_capability_group};

    #[test]
    fn everyone_sid() {
        let entry = SidAndAttributes::with_capability(
            &Win32Security,
            &SidCapability::WellKnown(WellKnownSid::World),
        )
        .expect("creating Everyone should succeed");
        assert_eq!(entry.sid().to_string(), "S-1-1-0");
        assert_eq!(entry.as_raw().Attributes, SE_GROUP_ENABLED);
    }

    #[test]
    fn internet_client_capability() {
        let entry = SidAndAttributes::with_capability(
            &Win32Security,
            &SidCapability::named(INTERNET_CLIENT),
        )
        .expect("deriving internetClient should succeed");
        assert_eq!(entry.sid().to_string(), "S-1-15-3-1");
    }

    #[test]
    fn group_list_points_at_owned_sids() {
        let group = build_capability_group(
            &Win32Security,
            &[WellKnownSid::AuthenticatedUser.into(), SidCapability::named(INTERNET_CLIENT)],
        )
        .expect("build should succeed");
        let raw = raw_group_list(&group);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].Sid, group[0].sid().handle().as_psid());
        assert!(unsafe { Security::IsValidSid(raw[1].Sid) }.as_bool());
    }
}
