//! Integrity verification for downloaded artefacts.
//!
//! [`verify`] is the only way to obtain a [`VerifiedArtefact`], and archive
//! extraction accepts nothing else. Unverified bytes therefore cannot reach
//! the extractor. A mismatch is an error, not a `false`, so callers cannot
//! fall through into installation by forgetting to check a flag.

use super::sha256_digest::Sha256Digest;
use log::{debug, warn};

/// The downloaded bytes did not hash to the expected digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("checksum mismatch: expected sha256 {expected}, got {actual}")]
pub struct IntegrityError {
    /// Digest recorded in the manifest.
    pub expected: Sha256Digest,
    /// Digest computed over the downloaded bytes.
    pub actual: Sha256Digest,
}

/// Archive bytes whose SHA-256 digest matched the manifest.
///
/// Only [`verify`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedArtefact {
    bytes: Vec<u8>,
    digest: Sha256Digest,
}

impl VerifiedArtefact {
    /// Return the verified archive bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return the digest the bytes were verified against.
    #[must_use]
    pub const fn digest(&self) -> &Sha256Digest {
        &self.digest
    }
}

/// Hash `bytes` and compare against `expected`.
///
/// # Errors
///
/// Returns [`IntegrityError`] when the digests differ.
///
/// # Examples
///
/// ```
/// use release_installer::artefact::sha256_digest::Sha256Digest;
/// use release_installer::artefact::verification::verify;
///
/// let expected = Sha256Digest::of(b"archive");
/// assert!(verify(b"archive".to_vec(), &expected).is_ok());
/// assert!(verify(b"archivf".to_vec(), &expected).is_err());
/// ```
pub fn verify(bytes: Vec<u8>, expected: &Sha256Digest) -> Result<VerifiedArtefact, IntegrityError> {
    let actual = Sha256Digest::of(&bytes);
    if !actual.ct_eq(expected) {
        warn!("checksum mismatch: expected {expected}, computed {actual}");
        return Err(IntegrityError {
            expected: expected.clone(),
            actual,
        });
    }
    debug!("verified {} bytes against sha256 {expected}", bytes.len());
    Ok(VerifiedArtefact {
        bytes,
        digest: actual,
    })
}
