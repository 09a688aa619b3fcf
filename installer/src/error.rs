//! Error types for the release installer.
//!
//! Every failure carries the pipeline stage it happened in and, where one
//! is known, the package, version, and platform being installed. The CLI
//! prints the `Display` form as its single diagnostic line, so each message
//! begins with the stage.

use crate::artefact::download::DownloadError;
use crate::artefact::error::ArtefactError;
use crate::artefact::extraction::ExtractionError;
use crate::artefact::generate::GenerateError;
use crate::artefact::manifest::{ReleaseManifest, UnsupportedPlatformError};
use crate::artefact::manifest_parser::ManifestParseError;
use crate::artefact::platform::Platform;
use crate::artefact::verification::IntegrityError;
use crate::config::ConfigError;
use crate::install::{InstallError, PermissionError};
use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// The pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reading configuration or the manifest.
    Load,
    /// Selecting the target for a platform.
    Resolve,
    /// Downloading the archive.
    Fetch,
    /// Checking the archive digest.
    Verify,
    /// Extracting and writing the binary.
    Install,
    /// Building a manifest from local archives.
    Generate,
}

impl Stage {
    /// Return the lowercase stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Resolve => "resolve",
            Self::Fetch => "fetch",
            Self::Verify => "verify",
            Self::Install => "install",
            Self::Generate => "generate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was being installed when a stage failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseContext {
    /// Package name.
    pub package: String,
    /// Release version.
    pub version: String,
    /// Target platform.
    pub platform: Platform,
}

impl ReleaseContext {
    /// Describe an install of `manifest` for `platform`.
    #[must_use]
    pub fn new(manifest: &ReleaseManifest, platform: Platform) -> Self {
        Self {
            package: manifest.package_name().to_string(),
            version: manifest.version().to_owned(),
            platform,
        }
    }
}

impl fmt::Display for ReleaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.package, self.version, self.platform)
    }
}

/// Errors that can occur during installation.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The manifest has no target for the requested platform.
    #[error("resolve failed: {0}")]
    UnsupportedPlatform(#[from] UnsupportedPlatformError),

    /// The host is outside the supported platform matrix.
    #[error("resolve failed: {0}; pass --os and --arch")]
    UnsupportedHost(#[source] ArtefactError),

    /// The archive could not be downloaded.
    #[error("fetch failed for {context}: {source}")]
    Network {
        /// Release being installed.
        context: ReleaseContext,
        /// Download failure.
        #[source]
        source: DownloadError,
    },

    /// The archive digest did not match the manifest.
    #[error("verify failed for {context}: {source}")]
    Integrity {
        /// Release being installed.
        context: ReleaseContext,
        /// Digest mismatch.
        #[source]
        source: IntegrityError,
    },

    /// The binary could not be read out of the archive.
    #[error("install failed for {context}: {source}")]
    Extraction {
        /// Release being installed.
        context: ReleaseContext,
        /// Extraction failure.
        #[source]
        source: ExtractionError,
    },

    /// The binary could not be written into the destination.
    #[error("install failed for {context}: {source}")]
    Permission {
        /// Release being installed.
        context: ReleaseContext,
        /// Filesystem failure.
        #[source]
        source: PermissionError,
    },

    /// The manifest could not be loaded or is invalid.
    #[error("load failed: {0}")]
    Manifest(#[from] ManifestParseError),

    /// The manifest describes a different package than the one requested.
    #[error("load failed: manifest {path} describes {found}, not {requested}")]
    ManifestMismatch {
        /// Manifest that was loaded.
        path: Utf8PathBuf,
        /// Package named on the command line.
        requested: String,
        /// Package named in the manifest.
        found: String,
    },

    /// The configuration file could not be loaded or resolved.
    #[error("load failed: {0}")]
    Config(#[from] ConfigError),

    /// A command-line value failed validation.
    #[error("load failed: {0}")]
    InvalidInput(#[from] ArtefactError),

    /// Manifest generation failed.
    #[error("generate failed: {0}")]
    Generate(#[from] GenerateError),

    /// A generated manifest could not be written.
    #[error("generate failed: cannot write {path}: {source}")]
    Io {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The generated manifest could not be serialised.
    #[error("generate failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl InstallerError {
    /// Attach release context to an install-step failure.
    #[must_use]
    pub fn from_install(context: ReleaseContext, error: InstallError) -> Self {
        match error {
            InstallError::Extraction(source) => Self::Extraction { context, source },
            InstallError::Permission(source) => Self::Permission { context, source },
        }
    }

    /// Return the stage the failure occurred in.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::UnsupportedPlatform(_) | Self::UnsupportedHost(_) => Stage::Resolve,
            Self::Network { .. } => Stage::Fetch,
            Self::Integrity { .. } => Stage::Verify,
            Self::Extraction { .. } | Self::Permission { .. } => Stage::Install,
            Self::Manifest(_)
            | Self::ManifestMismatch { .. }
            | Self::Config(_)
            | Self::InvalidInput(_) => Stage::Load,
            Self::Generate(_) | Self::Io { .. } | Self::Serialize(_) => Stage::Generate,
        }
    }

    /// Return the release being installed, when the failure happened after
    /// resolution.
    #[must_use]
    pub const fn context(&self) -> Option<&ReleaseContext> {
        match self {
            Self::Network { context, .. }
            | Self::Integrity { context, .. }
            | Self::Extraction { context, .. }
            | Self::Permission { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
