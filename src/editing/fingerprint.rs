//! Content fingerprints for detecting concurrent modification.

use crate::error::DryError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io;
use std::path::Path;

/// SHA-256 of a file's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    pub fn of_file(path: &Path) -> Result<Self, DryError> {
        let bytes = std::fs::read(path).map_err(|e| DryError::io(path, e))?;
        Ok(Self::of_bytes(&bytes))
    }

    /// Like [`Fingerprint::of_file`], but a missing file is `None` rather than an error.
    pub fn of_file_if_exists(path: &Path) -> Result<Option<Self>, DryError> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(Self::of_bytes(&bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DryError::io(path, e)),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
