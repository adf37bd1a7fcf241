//! # Validation Error Types

use crate::crypt::DecryptionError;
use std::fmt;
use thiserror::Error;

/// Where in a Paas an SSH secret lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretLocation {
    /// `spec.sshSecrets[key]`
    TopLevel { key: String },
    /// `spec.capabilities[capability].sshSecrets[key]`
    Capability { capability: String, key: String },
}

impl SecretLocation {
    pub fn key(&self) -> &str {
        match self {
            SecretLocation::TopLevel { key } | SecretLocation::Capability { key, .. } => key,
        }
    }

    pub fn capability(&self) -> Option<&str> {
        match self {
            SecretLocation::TopLevel { .. } => None,
            SecretLocation::Capability { capability, .. } => Some(capability),
        }
    }

    /// Label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            SecretLocation::TopLevel { .. } => "top_level",
            SecretLocation::Capability { .. } => "capability",
        }
    }
}

impl fmt::Display for SecretLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretLocation::TopLevel { key } => write!(f, "sshSecrets[{key}]"),
            SecretLocation::Capability { capability, key } => {
                write!(f, "capabilities[{capability}].sshSecrets[{key}]")
            }
        }
    }
}

/// An SSH secret in a Paas could not be decrypted
#[derive(Debug, Error)]
#[error("unable to decrypt {location}: {source}")]
pub struct ValidationError {
    location: SecretLocation,
    #[source]
    source: DecryptionError,
}

impl ValidationError {
    pub fn new(location: SecretLocation, source: DecryptionError) -> Self {
        Self { location, source }
    }

    pub fn location(&self) -> &SecretLocation {
        &self.location
    }

    pub fn source_error(&self) -> &DecryptionError {
        &self.source
    }

    pub fn reason(&self) -> &'static str {
        self.source.reason()
    }
}
