// SPDX-License-Identifier: MIT

//! SID construction errors.

/// The step of well-known SID construction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidCreationStep {
    CreateWellKnown,
    ValidateWellKnown,
}

impl std::fmt::Display for SidCreationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateWellKnown => f.write_str("CreateWellKnownSid"),
            Self::ValidateWellKnown => f.write_str("IsWellKnownSid"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SidError {
    #[error("{step} failed")]
    CreationFailed {
        step: SidCreationStep,
        #[source]
        source: std::io::Error,
    },

    #[error("could not derive capability SIDs for {name}")]
    CapabilityDerivation {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("capability {name} resolved to {count} capability SIDs, expected exactly one")]
    AmbiguousOrUnsupportedCapability { name: String, count: usize },

    #[error("could not convert the SID to a string")]
    DisplayString {
        #[source]
        source: std::io::Error,
    },
}
