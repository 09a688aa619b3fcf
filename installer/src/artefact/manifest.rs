//! Release manifest types and platform resolution.
//!
//! A [`ReleaseManifest`] describes one version of one package: where each
//! platform's archive lives and the SHA-256 digest it must match. Manifests
//! are immutable once built. Every invariant (unique platforms, at least one
//! target, well-formed names) is checked at construction, so resolution is a
//! plain map lookup.

use super::artefact_url::{ArchiveFormat, ArtefactUrl};
use super::error::{ArtefactError, Result};
use super::naming::{BinaryName, PackageName, validate_version};
use super::platform::Platform;
use super::sha256_digest::Sha256Digest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The highest manifest schema version this build can read.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// The digest algorithm named by a manifest.
///
/// Only SHA-256 is accepted; the field exists so that a manifest states the
/// algorithm its checksums use rather than leaving it implicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, hex-encoded.
    #[default]
    Sha256,
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}

/// One installable `(os, arch)` variant of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTarget {
    platform: Platform,
    url: ArtefactUrl,
    checksum: Sha256Digest,
}

impl PlatformTarget {
    /// Build a target from validated parts.
    #[must_use]
    pub const fn new(platform: Platform, url: ArtefactUrl, checksum: Sha256Digest) -> Self {
        Self {
            platform,
            url,
            checksum,
        }
    }

    /// Return the platform this target serves.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Return the download URL.
    #[must_use]
    pub const fn url(&self) -> &ArtefactUrl {
        &self.url
    }

    /// Return the expected archive digest.
    #[must_use]
    pub const fn checksum(&self) -> &Sha256Digest {
        &self.checksum
    }

    /// Return the archive container inferred from the URL.
    #[must_use]
    pub const fn archive_format(&self) -> ArchiveFormat {
        self.url.archive_format()
    }
}

/// Fields identifying what a manifest installs.
///
/// Grouped so the [`ReleaseManifest`] constructor takes identity, notes,
/// and targets as three arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseIdentity {
    /// Logical package name, e.g. `kubectl-ai`.
    pub package_name: PackageName,
    /// Release version, e.g. `0.0.11`.
    pub version: String,
    /// Executable to extract from the archive; defaults to the package name.
    pub binary_name: Option<BinaryName>,
}

/// Informational fields shown to users but never used for resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseNotes {
    /// One-line package description.
    pub description: Option<String>,
    /// Project homepage.
    pub homepage: Option<String>,
    /// Notice printed after a successful install.
    pub caveats: Option<String>,
}

/// An immutable, validated release manifest.
///
/// # Examples
///
/// ```
/// use release_installer::artefact::artefact_url::ArtefactUrl;
/// use release_installer::artefact::manifest::{
///     PlatformTarget, ReleaseIdentity, ReleaseManifest, ReleaseNotes,
/// };
/// use release_installer::artefact::naming::PackageName;
/// use release_installer::artefact::platform::{Arch, Os, Platform};
/// use release_installer::artefact::sha256_digest::Sha256Digest;
///
/// let linux = Platform::new(Os::Linux, Arch::Amd64);
/// let target = PlatformTarget::new(
///     linux,
///     ArtefactUrl::try_from(
///         "https://github.com/sozercan/kubectl-ai/releases/download/v0.0.12/kubectl-ai_linux_amd64.tar.gz",
///     )
///     .expect("valid URL"),
///     Sha256Digest::try_from(
///         "6f390023a8fe46a5237a15e934be3189230896dff64bc2a49cf4c8f1df59d690",
///     )
///     .expect("valid digest"),
/// );
/// let identity = ReleaseIdentity {
///     package_name: PackageName::try_from("kubectl-ai").expect("valid name"),
///     version: "0.0.12".to_owned(),
///     binary_name: None,
/// };
/// let manifest = ReleaseManifest::new(identity, ReleaseNotes::default(), vec![target])
///     .expect("valid manifest");
/// assert_eq!(manifest.resolve(linux).expect("published").platform(), linux);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseManifest {
    identity: ReleaseIdentity,
    notes: ReleaseNotes,
    targets: BTreeMap<Platform, PlatformTarget>,
}

impl ReleaseManifest {
    /// Build a manifest, rejecting invalid versions, empty target lists, and
    /// duplicate platforms.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::InvalidVersion`], [`ArtefactError::NoTargets`],
    /// or [`ArtefactError::DuplicateTarget`].
    pub fn new(
        identity: ReleaseIdentity,
        notes: ReleaseNotes,
        targets: Vec<PlatformTarget>,
    ) -> Result<Self> {
        validate_version(&identity.version)?;
        if targets.is_empty() {
            return Err(ArtefactError::NoTargets);
        }
        let mut by_platform = BTreeMap::new();
        for target in targets {
            let platform = target.platform();
            if by_platform.insert(platform, target).is_some() {
                return Err(ArtefactError::DuplicateTarget { platform });
            }
        }
        Ok(Self {
            identity,
            notes,
            targets: by_platform,
        })
    }

    /// Return the package name.
    #[must_use]
    pub const fn package_name(&self) -> &PackageName {
        &self.identity.package_name
    }

    /// Return the release version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.identity.version
    }

    /// Return the executable name to extract, falling back to the package
    /// name.
    #[must_use]
    pub fn binary_name(&self) -> BinaryName {
        self.identity
            .binary_name
            .clone()
            .unwrap_or_else(|| BinaryName::from(&self.identity.package_name))
    }

    /// Return the identity fields as supplied.
    #[must_use]
    pub const fn identity(&self) -> &ReleaseIdentity {
        &self.identity
    }

    /// Return the informational fields.
    #[must_use]
    pub const fn notes(&self) -> &ReleaseNotes {
        &self.notes
    }

    /// Return the digest algorithm used by every checksum in the manifest.
    #[must_use]
    pub const fn digest_algorithm(&self) -> DigestAlgorithm {
        DigestAlgorithm::Sha256
    }

    /// Iterate over targets in platform order.
    pub fn targets(&self) -> impl Iterator<Item = &PlatformTarget> {
        self.targets.values()
    }

    /// Iterate over the platforms this release publishes.
    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.targets.keys().copied()
    }

    /// Select the target published for `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPlatformError`] when the release has no archive
    /// for `platform`.
    pub fn resolve(
        &self,
        platform: Platform,
    ) -> std::result::Result<&PlatformTarget, UnsupportedPlatformError> {
        self.targets
            .get(&platform)
            .ok_or_else(|| UnsupportedPlatformError {
                package: self.identity.package_name.to_string(),
                version: self.identity.version.clone(),
                platform,
                available: self
                    .platforms()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// The requested platform is not published for this release.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{package} {version} is not published for {platform} (available: {available})")]
pub struct UnsupportedPlatformError {
    /// Package that was requested.
    pub package: String,
    /// Release version that was requested.
    pub version: String,
    /// Platform that has no target.
    pub platform: Platform,
    /// Comma-separated list of published platforms.
    pub available: String,
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
