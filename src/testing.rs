// SPDX-License-Identifier: MIT

//! Test doubles for the filesystem and the OS security calls.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::rc::Rc;

use crate::launch::fs::FileSystem;
use crate::security::{DerivedSids, SecurityPlatform, WellKnownSid};

/// A filesystem that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    paths: RefCell<BTreeSet<String>>,
    failing_copy: Option<String>,
    copies: RefCell<Vec<(String, String)>>,
    created: RefCell<Vec<String>>,
    removed: RefCell<Vec<String>>,
}

impl MemoryFileSystem {
    pub fn with_paths(paths: &[&str]) -> Self {
        Self {
            paths: RefCell::new(paths.iter().map(|p| p.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Make copying the given source fail.
    pub fn failing_copy(mut self, source: &str) -> Self {
        self.failing_copy = Some(source.to_string());
        self
    }

    pub fn copies(&self) -> Vec<(String, String)> {
        self.copies.borrow().clone()
    }

    pub fn created_dirs(&self) -> Vec<String> {
        self.created.borrow().clone()
    }

    pub fn removed_dirs(&self) -> Vec<String> {
        self.removed.borrow().clone()
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &str) -> bool {
        self.paths.borrow().contains(path)
    }

    fn remove_dir_all(&self, path: &str) -> std::io::Result<()> {
        self.removed.borrow_mut().push(path.to_string());
        self.paths.borrow_mut().retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn create_dir_all(&self, path: &str) -> std::io::Result<()> {
        self.created.borrow_mut().push(path.to_string());
        self.paths.borrow_mut().insert(path.to_string());
        Ok(())
    }

    fn copy(&self, source: &str, target: &str) -> std::io::Result<()> {
        if self.failing_copy.as_deref() == Some(source) {
            return Err(std::io::Error::new(ErrorKind::PermissionDenied, "access denied"));
        }
        self.copies.borrow_mut().push((source.to_string(), target.to_string()));
        self.paths.borrow_mut().insert(target.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Ledger {
    next: u32,
    live: BTreeMap<u32, Option<WellKnownSid>>,
    released: Vec<u32>,
    capabilities: BTreeMap<String, (usize, usize)>,
    fail_create: bool,
    fail_validation: bool,
    fail_display: bool,
}

impl Ledger {
    fn allocate(&mut self, kind: Option<WellKnownSid>) -> u32 {
        self.next += 1;
        self.live.insert(self.next, kind);
        self.next
    }
}

/// Security platform that hands out numbered SIDs and tracks their release.
/// Releasing a SID twice panics.
#[derive(Debug, Default, Clone)]
pub struct FakeSecurity {
    ledger: Rc<RefCell<Ledger>>,
}

impl FakeSecurity {
    /// Derivation of `name` yields the given number of group and capability SIDs.
    pub fn with_capability(self, name: &str, groups: usize, capabilities: usize) -> Self {
        self.ledger
            .borrow_mut()
            .capabilities
            .insert(name.to_string(), (groups, capabilities));
        self
    }

    pub fn failing_create(self) -> Self {
        self.ledger.borrow_mut().fail_create = true;
        self
    }

    pub fn failing_validation(self) -> Self {
        self.ledger.borrow_mut().fail_validation = true;
        self
    }

    pub fn failing_display(self) -> Self {
        self.ledger.borrow_mut().fail_display = true;
        self
    }

    /// Hand out a raw SID directly.
    pub fn allocate(&self) -> u32 {
        self.ledger.borrow_mut().allocate(None)
    }

    pub fn live(&self) -> Vec<u32> {
        self.ledger.borrow().live.keys().copied().collect()
    }

    pub fn released(&self) -> Vec<u32> {
        self.ledger.borrow().released.clone()
    }

    pub fn kind_of(&self, handle: u32) -> Option<WellKnownSid> {
        self.ledger.borrow().live.get(&handle).copied().flatten()
    }
}

impl SecurityPlatform for FakeSecurity {
    type Handle = u32;

    fn create_well_known(&self, kind: WellKnownSid) -> std::io::Result<u32> {
        let mut ledger = self.ledger.borrow_mut();
        if ledger.fail_create {
            return Err(std::io::Error::new(ErrorKind::InvalidInput, "bad SID type"));
        }
        Ok(ledger.allocate(Some(kind)))
    }

    fn is_well_known(&self, handle: &u32, kind: WellKnownSid) -> bool {
        let ledger = self.ledger.borrow();
        !ledger.fail_validation && ledger.live.get(handle).copied().flatten() == Some(kind)
    }

    fn derive_capability_sids(&self, name: &str) -> std::io::Result<DerivedSids<u32>> {
        let mut ledger = self.ledger.borrow_mut();
        let Some(&(groups, capabilities)) = ledger.capabilities.get(name) else {
            return Err(std::io::Error::new(ErrorKind::NotFound, "unknown capability"));
        };
        Ok(DerivedSids {
            groups: (0..groups).map(|_| ledger.allocate(None)).collect(),
            capabilities: (0..capabilities).map(|_| ledger.allocate(None)).collect(),
        })
    }

    fn display_string(&self, handle: &u32) -> std::io::Result<String> {
        if self.ledger.borrow().fail_display {
            return Err(std::io::Error::new(ErrorKind::InvalidData, "invalid SID"));
        }
        Ok(format!("S-1-15-3-{handle}"))
    }

    unsafe fn release(&self, handle: u32) {
        let mut ledger = self.ledger.borrow_mut();
        assert!(ledger.live.remove(&handle).is_some(), "SID {handle} released twice");
        ledger.released.push(handle);
    }
}
