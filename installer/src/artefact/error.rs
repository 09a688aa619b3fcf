//! Error types for release manifest values.
//!
//! Each variant names the rejected input and the constraint it violated.
//! These errors are raised while a manifest is constructed or loaded, never
//! while an install is running.

use super::platform::Platform;
use thiserror::Error;

/// Errors arising from invalid manifest values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// An operating system name is not one of the supported set.
    #[error("unknown operating system \"{value}\"; expected one of: macos, linux")]
    UnknownOs {
        /// The rejected name.
        value: String,
    },

    /// An architecture name is not one of the supported set.
    #[error("unknown architecture \"{value}\"; expected one of: arm64, amd64")]
    UnknownArch {
        /// The rejected name.
        value: String,
    },

    /// A platform string is not of the form `<os>/<arch>`.
    #[error("invalid platform \"{value}\": expected <os>/<arch>")]
    InvalidPlatform {
        /// The rejected platform string.
        value: String,
    },

    /// A `--archive` value is not of the form `<os>/<arch>=<path>`.
    #[error("invalid archive \"{value}\": expected <os>/<arch>=<path>")]
    InvalidArchiveSpec {
        /// The rejected argument.
        value: String,
    },

    /// The running host is outside the supported platform matrix.
    #[error("host platform {os}/{arch} is not supported")]
    UnsupportedHost {
        /// The host operating system as reported by the standard library.
        os: String,
        /// The host architecture as reported by the standard library.
        arch: String,
    },

    /// A SHA-256 digest is not a valid 64-character lowercase hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// A download URL could not be parsed.
    #[error("invalid URL \"{value}\": {reason}")]
    InvalidUrl {
        /// The rejected URL.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A download URL does not use HTTPS.
    #[error("URL \"{value}\" must use https")]
    InsecureUrl {
        /// The rejected URL.
        value: String,
    },

    /// A download URL does not end in a recognised archive suffix.
    #[error("URL \"{value}\" does not name a .tar.gz, .tgz, .tar.zst, or .zip archive")]
    UnsupportedArchiveFormat {
        /// The rejected URL.
        value: String,
    },

    /// A schema version is outside the accepted range.
    #[error("unsupported schema version {value}; current maximum is {max}")]
    UnsupportedSchemaVersion {
        /// The rejected version number.
        value: u32,
        /// The highest version this build understands.
        max: u32,
    },

    /// A package name is empty or contains characters outside `[A-Za-z0-9._-]`.
    #[error("invalid package name \"{value}\": {reason}")]
    InvalidPackageName {
        /// The rejected name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A binary name is empty or would escape the destination directory.
    #[error("invalid binary name \"{value}\": {reason}")]
    InvalidBinaryName {
        /// The rejected name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A release version is empty or contains whitespace.
    #[error("invalid release version \"{value}\"")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
    },

    /// Two targets share the same `(os, arch)` pair.
    #[error("duplicate target for platform {platform}")]
    DuplicateTarget {
        /// The repeated platform.
        platform: Platform,
    },

    /// The manifest lists no targets at all.
    #[error("manifest must list at least one target")]
    NoTargets,
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;
